//! Rule Registry
//!
//! Describes every rule the screener applies, for listing and for naming
//! rules in diagnostics.

use crate::risk::RiskRule;

/// Available rule categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Data completeness
    Completeness,
    /// Profitability and capital adequacy
    Solvency,
    /// Cash generation and cash versus debt
    Liquidity,
    /// Quality of returns
    Quality,
    /// Dividend policy
    Dividend,
    /// Period-over-period growth
    Growth,
}

/// Which classification a rule feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleSet {
    /// Any breach makes the company risky
    Risk,
    /// Every check must hold for the company to be growing
    Growth,
}

/// Rule metadata
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Rule name (unique identifier)
    pub name: &'static str,
    /// Rule set the rule belongs to
    pub set: RuleSet,
    /// Rule category
    pub category: RuleCategory,
    /// What the rule checks
    pub description: &'static str,
}

/// Get all available rule info
pub fn available_rules() -> Vec<RuleInfo> {
    vec![
        // Risk rules
        RuleInfo {
            name: "completeness",
            set: RuleSet::Risk,
            category: RuleCategory::Completeness,
            description: "Every period has profit-and-loss, balance sheet, cash flow and dividend data",
        },
        RuleInfo {
            name: "net_profit",
            set: RuleSet::Risk,
            category: RuleCategory::Solvency,
            description: "Net profit is positive in every period",
        },
        RuleInfo {
            name: "capital",
            set: RuleSet::Risk,
            category: RuleCategory::Solvency,
            description: "Retained earnings are positive and equity ratio is at least the floor",
        },
        RuleInfo {
            name: "operating_cash_flow",
            set: RuleSet::Risk,
            category: RuleCategory::Liquidity,
            description: "Operating cash flow is positive in every period",
        },
        RuleInfo {
            name: "liquidity",
            set: RuleSet::Risk,
            category: RuleCategory::Liquidity,
            description: "Cash and equivalents exceed short-term plus long-term debt",
        },
        RuleInfo {
            name: "leverage",
            set: RuleSet::Risk,
            category: RuleCategory::Quality,
            description: "ROE / ROA stays below the limit, so returns come from assets, not debt",
        },
        RuleInfo {
            name: "payout",
            set: RuleSet::Risk,
            category: RuleCategory::Dividend,
            description: "Payout ratio stays strictly inside the sustainable band",
        },
        // Growth rules
        RuleInfo {
            name: "history",
            set: RuleSet::Growth,
            category: RuleCategory::Completeness,
            description: "At least the required number of periods, each with profit-and-loss data",
        },
        RuleInfo {
            name: "ordinary_profit_growth",
            set: RuleSet::Growth,
            category: RuleCategory::Growth,
            description: "Ordinary profit grows by the minimum ratio between consecutive periods",
        },
        RuleInfo {
            name: "revenue_growth",
            set: RuleSet::Growth,
            category: RuleCategory::Growth,
            description: "Revenue grows by the minimum ratio between consecutive periods",
        },
        RuleInfo {
            name: "roe_floor",
            set: RuleSet::Growth,
            category: RuleCategory::Quality,
            description: "ROE is at least the floor in every period",
        },
        RuleInfo {
            name: "roa_floor",
            set: RuleSet::Growth,
            category: RuleCategory::Quality,
            description: "ROA is at least the floor in every period",
        },
    ]
}

/// Get rules by category
pub fn rules_by_category(category: RuleCategory) -> Vec<RuleInfo> {
    available_rules()
        .into_iter()
        .filter(|r| r.category == category)
        .collect()
}

/// Get rules of one rule set
pub fn rules_in_set(set: RuleSet) -> Vec<RuleInfo> {
    available_rules()
        .into_iter()
        .filter(|r| r.set == set)
        .collect()
}

/// Get rule info by name
pub fn get_rule_info(name: &str) -> Option<RuleInfo> {
    available_rules().into_iter().find(|r| r.name == name)
}

impl RiskRule {
    /// Registry entry for this rule.
    pub fn info(&self) -> Option<RuleInfo> {
        get_rule_info(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_rules() {
        let rules = available_rules();
        assert_eq!(rules.len(), 12);
    }

    #[test]
    fn test_rule_names_are_unique() {
        let rules = available_rules();
        let mut names: Vec<_> = rules.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_rules_by_category() {
        let liquidity = rules_by_category(RuleCategory::Liquidity);
        assert_eq!(liquidity.len(), 2);
        assert!(liquidity.iter().any(|r| r.name == "liquidity"));
    }

    #[test]
    fn test_rules_in_set() {
        assert_eq!(rules_in_set(RuleSet::Risk).len(), 7);
        assert_eq!(rules_in_set(RuleSet::Growth).len(), 5);
    }

    #[test]
    fn test_every_risk_rule_is_registered() {
        for rule in [
            RiskRule::Completeness,
            RiskRule::NetProfit,
            RiskRule::Capital,
            RiskRule::OperatingCashFlow,
            RiskRule::Liquidity,
            RiskRule::Leverage,
            RiskRule::Payout,
        ] {
            let info = rule.info().unwrap();
            assert_eq!(info.set, RuleSet::Risk);
        }
    }

    #[test]
    fn test_get_rule_info() {
        let info = get_rule_info("revenue_growth").unwrap();
        assert_eq!(info.category, RuleCategory::Growth);
        assert!(get_rule_info("nonexistent").is_none());
    }
}
