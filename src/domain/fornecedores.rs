// src/domain/fornecedores.rs

pub const FORNECEDOR_OUTRO: &str = "OUTRO FORNECEDOR";

/// Fornecedores conhecidos: chave normalizada -> nome de exibição.
const FORNECEDORES_CONHECIDOS: [(&str, &str); 10] = [
    ("IB SERVICES", "iB Services"),
    ("MVC SECURITY", "MVC Security"),
    ("RED HAT", "Red Hat"),
    ("CYBERARK", "CyberArk"),
    ("TREND MICRO", "Trend Micro"),
    ("FORTINET", "Fortinet"),
    ("RIDGE SECURITY", "Ridge Security"),
    ("THALES", "Thales"),
    ("VIEWTINET", "Viewtinet"),
    (FORNECEDOR_OUTRO, "Outro Fornecedor"),
];

/// Nome como é armazenado: sem espaços extras e em maiúsculas.
pub fn normalizar(nome: &str) -> String {
    nome.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

pub fn normalizar_lista(nomes: &[String]) -> Vec<String> {
    let mut lista: Vec<String> = Vec::with_capacity(nomes.len());
    for nome in nomes.iter().map(|n| normalizar(n)).filter(|n| !n.is_empty()) {
        if !lista.contains(&nome) {
            lista.push(nome);
        }
    }
    lista
}

pub fn nome_exibicao(nome: &str) -> String {
    let chave = normalizar(nome);
    FORNECEDORES_CONHECIDOS
        .iter()
        .find(|(conhecido, _)| *conhecido == chave)
        .map(|(_, exibicao)| exibicao.to_string())
        .unwrap_or_else(|| nome.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_espacos_e_caixa() {
        assert_eq!(normalizar("  Red   hat "), "RED HAT");
    }

    #[test]
    fn lista_sem_duplicados_nem_vazios() {
        let entrada = vec!["Fortinet".to_string(), " FORTINET".to_string(), "  ".to_string(), "Thales".to_string()];
        assert_eq!(normalizar_lista(&entrada), vec!["FORTINET", "THALES"]);
    }

    #[test]
    fn exibe_nome_conhecido() {
        assert_eq!(nome_exibicao("RED HAT"), "Red Hat");
        assert_eq!(nome_exibicao("cyberark"), "CyberArk");
        assert_eq!(nome_exibicao("ACME LTDA"), "ACME LTDA");
    }
}
