//! Demonstration of the kessan rule registry
//!
//! This example shows how to:
//! - List every rule by set
//! - Query rules by category
//! - Look up a rule by name
//!
//! Run with: cargo run --example rule_registry_demo -p kessan-rules

use kessan_rules::{
    RuleCategory, RuleConfig, RuleSet, get_rule_info, rules_by_category, rules_in_set,
};

fn main() {
    println!("Kessan Rule Registry Demo");
    println!("=========================\n");

    for (set, title) in [
        (RuleSet::Risk, "Risk rules (any breach marks a company risky)"),
        (RuleSet::Growth, "Growth rules (all must hold)"),
    ] {
        println!("{title}:");
        for rule in rules_in_set(set) {
            println!("  {:24} {}", rule.name, rule.description);
        }
        println!();
    }

    println!("Rules by category:");
    for category in [
        RuleCategory::Completeness,
        RuleCategory::Solvency,
        RuleCategory::Liquidity,
        RuleCategory::Quality,
        RuleCategory::Dividend,
        RuleCategory::Growth,
    ] {
        let names: Vec<_> = rules_by_category(category)
            .into_iter()
            .map(|r| r.name)
            .collect();
        println!("  {:14} {}", format!("{category:?}"), names.join(", "));
    }

    println!("\nLookup 'leverage':");
    if let Some(info) = get_rule_info("leverage") {
        println!("  {} ({:?}/{:?}): {}", info.name, info.set, info.category, info.description);
    }

    let config = RuleConfig::default();
    println!("\nDefault thresholds:");
    println!("  equity ratio floor   {}%", config.risk.min_equity_ratio);
    println!("  ROE / ROA limit      {}", config.risk.max_roe_to_roa);
    println!(
        "  payout band          ({}%, {}%)",
        config.risk.min_payout_ratio, config.risk.max_payout_ratio
    );
    println!("  growth ratio         {}x", config.growth.min_growth_ratio);
    println!("  ROE floor            {}%", config.growth.min_roe);
    println!("  ROA floor            {}%", config.growth.min_roa);
}
