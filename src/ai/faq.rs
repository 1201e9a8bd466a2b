//! The static FAQ knowledge base that is embedded into the system
//! prompt. Entries keep their insertion order so the rendered prompt
//! (and therefore every cache fingerprint) is stable across runs.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub topic: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqTable(Vec<FaqEntry>);

impl FaqTable {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds an entry, replacing the answer in place when the topic
    /// already exists.
    pub fn insert(&mut self, topic: &str, answer: &str) {
        if let Some(entry) = self.0.iter_mut().find(|e| e.topic == topic) {
            entry.answer = answer.to_string();
        } else {
            self.0.push(FaqEntry {
                topic: topic.to_string(),
                answer: answer.to_string(),
            });
        }
    }

    pub fn get(&self, topic: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.topic == topic)
            .map(|e| e.answer.as_str())
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human friendly topic names for the help listing e.g.
    /// `track_order` becomes "Track Order".
    pub fn topics(&self) -> Vec<String> {
        self.0.iter().map(|e| title_case(&e.topic)).collect()
    }

    /// The knowledge base the bot ships with.
    pub fn store_defaults() -> Self {
        let mut table = Self::new();
        table.insert(
            "hours",
            "We're open Monday-Friday 9 AM - 6 PM, Saturday 10 AM - 4 PM, closed Sunday.",
        );
        table.insert(
            "location",
            "We're located at 123 Main Street, Downtown, New York, NY 10001.",
        );
        table.insert(
            "contact",
            "You can reach us at (555) 123-4567 or email support@example.com",
        );
        table.insert(
            "returns",
            "Returns accepted within 30 days with receipt. Full refund or exchange available.",
        );
        table.insert(
            "shipping",
            "Free shipping on orders over $50. Standard delivery: 3-5 business days. Express: 1-2 days.",
        );
        table.insert(
            "payment",
            "We accept Visa, MasterCard, American Express, PayPal, and Apple Pay.",
        );
        table.insert(
            "warranty",
            "All products come with a 1-year manufacturer warranty.",
        );
        table.insert(
            "track_order",
            "You can track your order at example.com/track using your order number.",
        );
        table
    }
}

fn title_case(topic: &str) -> String {
    topic
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
