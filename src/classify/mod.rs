//! Rule-based transaction classification
//!
//! Rules are an ordered table of keyword sets. The descriptor is uppercased
//! and the first rule with any keyword contained in it wins; there is no
//! scoring. When nothing matches, the transaction direction picks the
//! fallback, so classification never fails.

use crate::models::{Classification, ColorToken, Direction, Icon};

/// A keyword set and the classification it assigns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    keywords: Vec<String>,
    classification: Classification,
}

impl Rule {
    /// Create a rule; keywords are normalised to uppercase and blanks dropped
    pub fn new<I, S>(keywords: I, classification: Classification) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self {
            keywords,
            classification,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// `normalized` must already be uppercase
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }
}

/// Ordered rule table plus the two direction fallbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatcher {
    rules: Vec<Rule>,
    inflow_fallback: Classification,
    outflow_fallback: Classification,
}

impl RuleMatcher {
    /// Build a matcher from an ordered rule list and the default fallbacks
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            inflow_fallback: inflow_fallback(),
            outflow_fallback: outflow_fallback(),
        }
    }

    /// Replace the fallback classifications
    pub fn with_fallbacks(mut self, inflow: Classification, outflow: Classification) -> Self {
        self.inflow_fallback = inflow;
        self.outflow_fallback = outflow;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Classify a descriptor; total and deterministic
    pub fn classify(&self, descriptor: &str, direction: Direction) -> Classification {
        let normalized = descriptor.to_uppercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| rule.classification.clone())
            .unwrap_or_else(|| match direction {
                Direction::In => self.inflow_fallback.clone(),
                Direction::Out => self.outflow_fallback.clone(),
            })
    }
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

/// Classify with the built-in rule table
pub fn classify(descriptor: &str, direction: Direction) -> Classification {
    RuleMatcher::default().classify(descriptor, direction)
}

/// The built-in rule table; order is priority
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            ["UBER", "TAXI", "POSTO"],
            Classification::new("Transporte", "Uber Viagens", Icon::Car, ColorToken::Blue),
        ),
        Rule::new(
            ["PADARIA", "IFOOD", "MERCADO"],
            Classification::new(
                "Alimentação",
                "Padaria Estrela",
                Icon::Coffee,
                ColorToken::Orange,
            ),
        ),
        Rule::new(
            ["AMAZON", "MAGALU"],
            Classification::new(
                "Compras",
                "Amazon Shopping",
                Icon::ShoppingBag,
                ColorToken::Purple,
            ),
        ),
        Rule::new(
            ["ALUGUEL", "LUZ", "NET"],
            Classification::new("Casa", "Aluguel Mensal", Icon::Home, ColorToken::Red),
        ),
    ]
}

fn inflow_fallback() -> Classification {
    Classification::new(
        "Entrada",
        "Transferência Recebida",
        Icon::ArrowDownLeft,
        ColorToken::Green,
    )
}

fn outflow_fallback() -> Classification {
    Classification::new("Geral", "Outros Gastos", Icon::CreditCard, ColorToken::Gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uber_is_transport() {
        let c = classify("PGTO *UBER DO BRASIL TEC", Direction::Out);
        assert_eq!(c.category, "Transporte");
        assert_eq!(c.display_name, "Uber Viagens");
        assert_eq!(c.icon, Icon::Car);
        assert_eq!(c.color, ColorToken::Blue);
    }

    #[test]
    fn test_unmatched_inflow_is_entrada() {
        let c = classify("TRANSF PIX RECEBIDA - JOAO SILVA", Direction::In);
        assert_eq!(c.category, "Entrada");
        assert_eq!(c.display_name, "Transferência Recebida");
    }

    #[test]
    fn test_unmatched_outflow_is_geral() {
        let c = classify("COMPRA LOJA DESCONHECIDA", Direction::Out);
        assert_eq!(c.category, "Geral");
        assert_eq!(c.display_name, "Outros Gastos");
    }

    #[test]
    fn test_seed_descriptors() {
        let cases = [
            ("COMPRA CARTAO - PADARIA ESTRELA", "Alimentação"),
            ("PAGAMENTO BOLETO - ALUGUEL IMOB", "Casa"),
            ("COMPRA MKTPLACE - AMAZON SERV", "Compras"),
        ];
        for (descriptor, category) in cases {
            assert_eq!(classify(descriptor, Direction::Out).category, category);
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify("ifood *pedido", Direction::Out).category, "Alimentação");
        assert_eq!(classify("Magalu Loja 12", Direction::Out).category, "Compras");
    }

    #[test]
    fn test_rule_match_ignores_direction() {
        // A keyword hit wins even for inflows
        let c = classify("ESTORNO UBER", Direction::In);
        assert_eq!(c.category, "Transporte");
    }

    #[test]
    fn test_earlier_rule_wins() {
        // Transport keyword and shopping keyword in one descriptor
        let c = classify("AMAZON ENTREGA VIA UBER", Direction::Out);
        assert_eq!(c.category, "Transporte");

        // Food and housing: food comes first
        let c = classify("MERCADO DA LUZ", Direction::Out);
        assert_eq!(c.category, "Alimentação");
    }

    #[test]
    fn test_substring_matching() {
        // "NET" is a substring match, so it also hits inside longer words
        assert_eq!(classify("NETFLIX.COM", Direction::Out).category, "Casa");
    }

    #[test]
    fn test_empty_descriptor_falls_back() {
        assert_eq!(classify("", Direction::In).category, "Entrada");
        assert_eq!(classify("", Direction::Out).category, "Geral");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let matcher = RuleMatcher::default();
        for descriptor in ["PGTO *UBER", "xyz", "", "ALUGUEL", "ÁÉÍ çã"] {
            for direction in [Direction::In, Direction::Out] {
                assert_eq!(
                    matcher.classify(descriptor, direction),
                    matcher.classify(descriptor, direction)
                );
            }
        }
    }

    #[test]
    fn test_custom_rule_table_order() {
        let gym = Classification::new("Saúde", "Academia", Icon::Home, ColorToken::Green);
        let mut rules = vec![Rule::new(["smart fit", "uber"], gym.clone())];
        rules.extend(default_rules());
        let matcher = RuleMatcher::new(rules);

        assert_eq!(matcher.classify("SMART FIT MENSAL", Direction::Out), gym);
        assert_eq!(matcher.classify("UBER TRIP", Direction::Out), gym);
        assert_eq!(
            matcher.classify("POSTO IPIRANGA", Direction::Out).category,
            "Transporte"
        );
    }

    #[test]
    fn test_blank_keywords_are_dropped() {
        let rule = Rule::new(["", "  ", "posto"], outflow_fallback());
        assert_eq!(rule.keywords(), ["POSTO".to_string()]);

        let matcher = RuleMatcher::new(vec![rule]);
        assert_eq!(
            matcher.classify("anything", Direction::In).category,
            "Entrada"
        );
    }

    #[test]
    fn test_custom_fallbacks() {
        let inflow = Classification::new(
            "Receita",
            "Crédito",
            Icon::ArrowDownLeft,
            ColorToken::Green,
        );
        let outflow =
            Classification::new("Despesa", "Débito", Icon::CreditCard, ColorToken::Gray);
        let matcher =
            RuleMatcher::new(Vec::new()).with_fallbacks(inflow.clone(), outflow.clone());

        assert_eq!(matcher.classify("UBER", Direction::In), inflow);
        assert_eq!(matcher.classify("UBER", Direction::Out), outflow);
    }

    #[test]
    fn test_default_table_order() {
        let categories: Vec<_> = default_rules()
            .iter()
            .map(|r| r.classification().category.clone())
            .collect();
        assert_eq!(categories, ["Transporte", "Alimentação", "Compras", "Casa"]);
    }
}
