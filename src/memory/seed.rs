//! Built-in documents for a knowledge store with no usable snapshot.

use crate::memory::types::Record;

/// Provenance of built-in documents.
pub const SEED: &str = "seed";

struct SeedDoc {
    title: &'static str,
    content: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
}

const SEED_DOCS: &[SeedDoc] = &[
    SeedDoc {
        title: "Python Programming Basics",
        content: "Python is a high-level programming language known for its simplicity and \
                  readability. It supports multiple paradigms including object-oriented, \
                  procedural, and functional programming. Python is widely used in web \
                  development, data science, artificial intelligence, and automation.",
        category: "programming",
        tags: &["python", "programming", "basics"],
    },
    SeedDoc {
        title: "Machine Learning Fundamentals",
        content: "Machine learning is a subset of artificial intelligence that enables \
                  computers to learn patterns from data without being explicitly programmed. \
                  It includes supervised learning, unsupervised learning, and reinforcement \
                  learning approaches.",
        category: "ai",
        tags: &["machine learning", "ai", "data science"],
    },
    SeedDoc {
        title: "Software Development Best Practices",
        content: "Good software development practices include writing clean code, using \
                  version control, testing thoroughly, documenting code, following design \
                  patterns, and maintaining code quality through code reviews.",
        category: "software",
        tags: &["software development", "best practices", "coding"],
    },
    SeedDoc {
        title: "Technology in India",
        content: "India has a thriving technology sector with major IT hubs in cities like \
                  Bangalore, Hyderabad, and Pune. The country is home to numerous global tech \
                  companies and startups, making it a significant player in the global \
                  technology landscape.",
        category: "tech",
        tags: &["india", "technology", "bangalore", "it"],
    },
    SeedDoc {
        title: "Data Structures and Algorithms",
        content: "Data structures organize and store data efficiently, while algorithms are \
                  step-by-step procedures for solving problems. Common data structures include \
                  arrays, linked lists, trees, and graphs. Understanding these is crucial for \
                  programming interviews and efficient coding.",
        category: "programming",
        tags: &["data structures", "algorithms", "programming"],
    },
];

/// Fresh records for the built-in documents, in a fixed order.
pub fn seed_records() -> Vec<Record> {
    SEED_DOCS
        .iter()
        .map(|doc| {
            let mut record = Record::new(doc.content, SEED, doc.category, 0.5);
            record.title = Some(doc.title.to_string());
            record.tags = doc.tags.iter().map(|t| t.to_string()).collect();
            record
        })
        .collect()
}
