use crate::normalizer::normalize_name;
use regex::Regex;
use std::sync::LazyLock;

/// A category inferred from product words, with related categories to widen to.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGuess {
    pub category: &'static str,
    pub related: &'static [&'static str],
}

struct Rule {
    category: &'static str,
    related: &'static [&'static str],
    pattern: &'static str,
}

// Checked in order; the first hit wins.
const RULES: &[Rule] = &[
    Rule {
        category: "cpus",
        related: &[],
        pattern: r"\b(ryzen|intel|core i\d?|corei[3579]?|xeon|athlon|cpu|processor)\b",
    },
    Rule {
        category: "gpus",
        related: &[],
        pattern: r"\b(rtx|gtx|rx|radeon|graphics|gpu|graphics card)\b",
    },
    Rule {
        category: "motherboards",
        related: &[],
        pattern: r"\b(b\d+|x\d+|z\d+|h\d+|prime|tuf|pro|mpg|aorus|asus|msi|motherboard|mobo)\b",
    },
    Rule {
        category: "rams",
        related: &[],
        pattern: r"\b(ddr\d?|ram|memory)\b",
    },
    Rule {
        category: "storages",
        related: &["nvmes", "ssds", "hdds", "storages"],
        pattern: r"\b(ssd|nvme|sata|hdd|hard drive|storage)\b",
    },
    Rule {
        category: "psus",
        related: &[],
        pattern: r"\b(psu|power supply|watt)\b",
    },
    Rule {
        category: "coolers",
        related: &[],
        pattern: r"\b(cooler|aio|liquid|air cooler|masterliquid|hyper)\b",
    },
];

static COMPILED: LazyLock<Vec<(Regex, &'static Rule)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| (Regex::new(rule.pattern).expect("category pattern"), rule))
        .collect()
});

/// Guesses the component category a query talks about.
pub fn guess_category(text: &str) -> Option<CategoryGuess> {
    let normalized = normalize_name(text);
    COMPILED
        .iter()
        .find(|(re, _)| re.is_match(&normalized))
        .map(|(_, rule)| CategoryGuess {
            category: rule.category,
            related: rule.related,
        })
}
