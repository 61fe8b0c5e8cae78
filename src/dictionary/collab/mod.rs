//! Collaborators consumed through narrow contracts.
//!
//! - [`markup`]: Markdown → HTML rendering, HTML sanitization, HTML → Markdown
//! - [`romanize`]: Latin transliteration for archive file names
//! - [`media`]: image/audio/video identification and size checks
//!
//! Each contract is a trait; the default implementations are bundled in
//! [`Collaborators::default`].

pub mod markup;
pub mod media;
pub mod romanize;

use markup::{CommonMarkRenderer, MarkupRenderer};
use media::{MediaValidator, SniffingMediaValidator};
use romanize::{KanaRomanizer, Romanizer};

/// The set of collaborators one conversion runs with.
pub struct Collaborators {
    pub markup: Box<dyn MarkupRenderer>,
    pub romanizer: Box<dyn Romanizer>,
    pub media: Box<dyn MediaValidator>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            markup: Box::new(CommonMarkRenderer),
            romanizer: Box::new(KanaRomanizer),
            media: Box::new(SniffingMediaValidator::default()),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
