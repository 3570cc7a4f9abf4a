//! Fake data generation helpers.
//!
//! Provides deterministic fake data for names, study subjects and lorem
//! text. Every helper draws from the single RNG handed to [`FakeData::new`],
//! so the order of calls defines the generated fixture.

use rand::Rng;

/// First names for fake data (German locale)
const FIRST_NAMES: &[&str] = &[
    "Anna", "Ben", "Clara", "David", "Elias", "Emma", "Felix", "Finn", "Greta", "Hannah", "Jana",
    "Jonas", "Julia", "Karl", "Lara", "Lea", "Leon", "Lukas", "Marie", "Max", "Mia", "Nils",
    "Paul", "Sophie", "Tim", "Uwe", "Vera", "Werner", "Yvonne", "Zoe",
];

/// Last names for fake data (German locale)
const LAST_NAMES: &[&str] = &[
    "Bauer", "Becker", "Braun", "Fischer", "Hartmann", "Hoffmann", "Keller", "Klein", "Koch",
    "Krause", "Lange", "Lehmann", "Meyer", "Mueller", "Neumann", "Richter", "Schmidt",
    "Schneider", "Schulz", "Schwarz", "Wagner", "Weber", "Werner", "Wolf", "Zimmermann",
];

/// Study subjects a user can be enrolled in
const SUBJECTS: &[&str] = &["math", "bioinfo", "info", "mediainfo", "computer science"];

/// UI languages
const LANGUAGES: &[&str] = &["en", "de"];

/// Lorem ipsum words for text generation
const LOREM_WORDS: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "ex",
    "ea",
    "commodo",
    "consequat",
    "duis",
    "aute",
    "irure",
    "in",
    "reprehenderit",
    "voluptate",
    "velit",
    "esse",
    "cillum",
    "fugiat",
    "nulla",
    "pariatur",
    "excepteur",
    "sint",
    "occaecat",
    "cupidatat",
    "non",
    "proident",
    "sunt",
    "culpa",
    "qui",
    "officia",
    "deserunt",
    "mollit",
    "anim",
    "id",
    "est",
    "laborum",
];

/// Default upper bound for free text columns (descriptions, material names)
pub const TEXT_MAX_CHARS: usize = 200;

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a random first name
    pub fn first_name(&mut self) -> &'static str {
        FIRST_NAMES[self.rng.random_range(0..FIRST_NAMES.len())]
    }

    /// Generate a random last name
    pub fn last_name(&mut self) -> &'static str {
        LAST_NAMES[self.rng.random_range(0..LAST_NAMES.len())]
    }

    /// Pick a study subject
    pub fn subject(&mut self) -> &'static str {
        SUBJECTS[self.rng.random_range(0..SUBJECTS.len())]
    }

    /// Pick a UI language
    pub fn language(&mut self) -> &'static str {
        LANGUAGES[self.rng.random_range(0..LANGUAGES.len())]
    }

    /// Generate a random integer in the inclusive range `min..=max`
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Pick a random element from a non-empty slice of IDs
    pub fn pick_id(&mut self, ids: &[i64]) -> i64 {
        ids[self.rng.random_range(0..ids.len())]
    }

    /// 16 random bytes, used as the bcrypt salt
    pub fn salt(&mut self) -> [u8; 16] {
        let mut salt = [0u8; 16];
        self.rng.fill(&mut salt[..]);
        salt
    }

    /// Generate lorem ipsum text
    pub fn lorem(&mut self, word_count: usize) -> String {
        (0..word_count)
            .map(|_| LOREM_WORDS[self.rng.random_range(0..LOREM_WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Generate a sentence (capitalized, with period)
    pub fn sentence(&mut self, word_count: usize) -> String {
        let mut text = self.lorem(word_count);
        if let Some(first) = text.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        text.push('.');
        text
    }

    /// Generate sentences until `max_chars` would be exceeded.
    ///
    /// Always yields at least one sentence, truncated to `max_chars` if the
    /// first one is already too long.
    pub fn text(&mut self, max_chars: usize) -> String {
        let word_count = self.rng.random_range(4..12);
        let mut text = self.sentence(word_count);
        text.truncate(max_chars);
        loop {
            let word_count = self.rng.random_range(4..12);
            let sentence = self.sentence(word_count);
            if text.len() + 1 + sentence.len() > max_chars {
                break;
            }
            text.push(' ');
            text.push_str(&sentence);
        }
        text
    }
}
