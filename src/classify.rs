//! Carrier classification from label metadata.
//!
//! The decision is a closed, ordered table ([`RULES`]): each row pairs a
//! carrier with a matcher for the author field and one for the producer field.
//! The first row whose two matchers both accept wins. Supporting another
//! carrier means adding a row here and a crop formula in [`crate::region`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The carrier that produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Carrier {
    MondialRelay,
    Colissimo,
    /// No rule matched.
    Unrecognized,
}

impl Carrier {
    pub fn is_recognized(self) -> bool {
        self != Carrier::Unrecognized
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Carrier::MondialRelay => "Mondial Relay",
            Carrier::Colissimo => "Colissimo",
            Carrier::Unrecognized => "unrecognized",
        })
    }
}

/// How a single metadata field must look for a rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMatch {
    Any,
    Empty,
    Contains(&'static str),
}

impl FieldMatch {
    pub fn accepts(self, value: &str) -> bool {
        match self {
            FieldMatch::Any => true,
            FieldMatch::Empty => value.is_empty(),
            FieldMatch::Contains(token) => value.contains(token),
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub carrier: Carrier,
    pub author: FieldMatch,
    pub producer: FieldMatch,
}

/// Classification rules, evaluated in order.
pub const RULES: &[Rule] = &[
    Rule {
        carrier: Carrier::MondialRelay,
        author: FieldMatch::Contains("MondialRelay"),
        producer: FieldMatch::Any,
    },
    Rule {
        carrier: Carrier::Colissimo,
        author: FieldMatch::Empty,
        producer: FieldMatch::Contains("iText"),
    },
];

/// Classify a label from its author and producer metadata fields.
pub fn classify(author: &str, producer: &str) -> Carrier {
    RULES
        .iter()
        .find(|rule| rule.author.accepts(author) && rule.producer.accepts(producer))
        .map(|rule| rule.carrier)
        .unwrap_or(Carrier::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mondial_relay_author_wins_regardless_of_producer() {
        for producer in ["", "iText 2.1.7", "Acrobat Distiller", "MondialRelay"] {
            assert_eq!(classify("MondialRelay", producer), Carrier::MondialRelay);
        }
        assert_eq!(
            classify("Groupe MondialRelay SAS", "iText"),
            Carrier::MondialRelay
        );
    }

    #[test]
    fn empty_author_with_itext_producer_is_colissimo() {
        assert_eq!(classify("", "iText 5.5.13"), Carrier::Colissimo);
        assert_eq!(
            classify("", "iText® 7.1.0 ©2000-2018 iText Group NV"),
            Carrier::Colissimo
        );
    }

    #[test]
    fn everything_else_is_unrecognized() {
        assert_eq!(classify("", ""), Carrier::Unrecognized);
        assert_eq!(classify("", "LibreOffice"), Carrier::Unrecognized);
        assert_eq!(classify("La Poste", "iText"), Carrier::Unrecognized);
        // Matching is case-sensitive.
        assert_eq!(classify("mondialrelay", ""), Carrier::Unrecognized);
        assert_eq!(classify("", "itext"), Carrier::Unrecognized);
    }

    #[test]
    fn rule_order_is_first_match() {
        assert_eq!(RULES[0].carrier, Carrier::MondialRelay);
        assert!(RULES.iter().all(|r| r.carrier.is_recognized()));
    }

    #[test]
    fn display_names() {
        assert_eq!(Carrier::MondialRelay.to_string(), "Mondial Relay");
        assert_eq!(Carrier::Colissimo.to_string(), "Colissimo");
        assert_eq!(Carrier::Unrecognized.to_string(), "unrecognized");
    }
}
