use serde::{Deserialize, Serialize};

/// One line of the topic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRow {
    pub topic: String,
    /// Number of feeds carrying the topic.
    pub feeds: usize,
    /// Number of distinct sites whose feeds carry the topic.
    pub sites: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicReport {
    pub topics: Vec<TopicRow>,
    pub total_topics: usize,
}

impl TopicReport {
    pub fn new(topics: Vec<TopicRow>) -> Self {
        let total_topics = topics.len();
        Self {
            topics,
            total_topics,
        }
    }
}
