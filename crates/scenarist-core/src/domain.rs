//! Domain Classification
//!
//! Coarse, fast subject-matter inference over the parsed triple. The result
//! only steers template flavor and coverage weighting downstream, so a false
//! negative degrades richness, not correctness.

use crate::protocol::Domain;

/// Ordered keyword table; the first domain with any hit wins. Ties are
/// broken by this fixed priority order.
const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::MentalHealth,
        &[
            "mood", "therapy", "therapist", "anxiety", "depression", "meditation",
            "mindfulness", "wellbeing", "mental health", "journal", "stress",
        ],
    ),
    (
        Domain::Healthcare,
        &[
            "patient", "doctor", "nurse", "medical", "clinic", "hospital",
            "appointment", "prescription", "diagnosis", "vitals", "health",
        ],
    ),
    (
        Domain::Finance,
        &[
            "payment", "bank", "transaction", "invoice", "money", "transfer",
            "budget", "loan", "balance", "deposit", "withdraw", "currency",
        ],
    ),
    (
        Domain::Ecommerce,
        &[
            "product", "cart", "shop", "purchase", "order", "checkout", "catalog",
            "buy", "sell", "shipping", "wishlist", "store",
        ],
    ),
    (
        Domain::Security,
        &[
            "security", "encrypt", "authentication", "authorization", "permission",
            "password", "two-factor", "audit", "credential",
        ],
    ),
    (
        Domain::Education,
        &[
            "course", "student", "teacher", "lesson", "quiz", "grade", "learn",
            "assignment", "curriculum", "exam", "classroom",
        ],
    ),
    (
        Domain::Social,
        &[
            "friend", "post", "share", "follow", "comment", "profile", "feed",
            "message", "chat", "community", "like",
        ],
    ),
];

/// Classify the parsed triple into exactly one domain. Pure and
/// deterministic: case-insensitive substring matching, first match wins,
/// default `General`.
pub fn classify(actor: &str, action: &str, goal: &str) -> Domain {
    let haystack = format!("{} {} {}", actor, action, goal).to_lowercase();
    for (domain, keywords) in DOMAIN_KEYWORDS {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return *domain;
        }
    }
    Domain::General
}
