use rand::Rng;
use thiserror::Error;

const BUILTIN_PHRASES: [&str; 5] = [
    "The only way to do great work is to love what you do.",
    "Move fast and break things. Unless you are breaking stuff, you are not moving fast enough.",
    "Design is not just what it looks like and feels like. Design is how it works.",
    "Stay hungry, stay foolish. Never let the noise of others' opinions drown out your own inner voice.",
    "Simplicity is the ultimate sophistication.",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhraseError {
    #[error("phrase pool is empty")]
    EmptyPool,
    #[error("phrase #{0} is empty")]
    EmptyPhrase(usize),
}

/// Reference text for one session. Never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase {
    chars: Vec<char>,
}

impl Phrase {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).copied()
    }
}

/// Fixed pool of candidate phrases. Holding `first` apart keeps the pool
/// non-empty in the type.
#[derive(Clone, Debug)]
pub struct PhraseSource {
    first: Phrase,
    rest: Vec<Phrase>,
}

impl PhraseSource {
    pub fn new<S: AsRef<str>>(candidates: &[S]) -> Result<Self, PhraseError> {
        let mut phrases = Vec::with_capacity(candidates.len());
        for (i, text) in candidates.iter().enumerate() {
            let phrase = Phrase::new(text.as_ref());
            if phrase.is_empty() {
                return Err(PhraseError::EmptyPhrase(i));
            }
            phrases.push(phrase);
        }
        let mut phrases = phrases.into_iter();
        let first = phrases.next().ok_or(PhraseError::EmptyPool)?;
        Ok(Self {
            first,
            rest: phrases.collect(),
        })
    }

    pub fn builtin() -> Self {
        let [first, rest @ ..] = BUILTIN_PHRASES;
        Self {
            first: Phrase::new(first),
            rest: rest.iter().map(|p| Phrase::new(p)).collect(),
        }
    }

    pub fn count(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phrase> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    pub fn contains(&self, phrase: &Phrase) -> bool {
        self.iter().any(|p| p == phrase)
    }

    /// Uniform pick over the whole pool.
    pub fn select_phrase<R: Rng + ?Sized>(&self, rng: &mut R) -> Phrase {
        match rng.gen_range(0..self.count()) {
            0 => self.first.clone(),
            i => self.rest[i - 1].clone(),
        }
    }
}
