//! Options for inserting and extracting text chunks

use crate::text::TextVariant;

/// Options controlling [`insert_text_with`](crate::insert_text_with)
///
/// Builder-style; the default writes `tEXt` chunks and checks the signature.
///
/// # Example
///
/// ```
/// use png_text_chunk::{InsertOptions, TextVariant};
///
/// let options = InsertOptions::new().international();
/// assert_eq!(options.variant, TextVariant::International);
/// assert!(options.verify_signature);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOptions {
    /// Chunk type written for each entry
    pub variant: TextVariant,

    /// Reject input whose first 8 bytes are not the PNG signature
    pub verify_signature: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            variant: TextVariant::Plain,
            verify_signature: true,
        }
    }
}

impl InsertOptions {
    /// Create options with defaults (`tEXt`, signature checked)
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `iTXt` chunks instead of `tEXt`
    pub fn international(mut self) -> Self {
        self.variant = TextVariant::International;
        self
    }

    /// Write chunks of the given variant
    pub fn variant(mut self, variant: TextVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Skip the signature check; scanning still starts at offset 8
    pub fn skip_signature_check(mut self) -> Self {
        self.verify_signature = false;
        self
    }
}

/// Options controlling [`extract_text_with`](crate::extract_text_with)
///
/// # Example
///
/// ```
/// use png_text_chunk::ExtractOptions;
///
/// let strict = ExtractOptions::new().require_end();
/// assert!(strict.require_end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Reject input whose first 8 bytes are not the PNG signature
    pub verify_signature: bool,

    /// Fail with [`Error::MissingEnd`](crate::Error::MissingEnd) when the
    /// stream ends before an IEND chunk
    pub require_end: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            verify_signature: true,
            require_end: false,
        }
    }
}

impl ExtractOptions {
    /// Create options with defaults (signature checked, IEND optional)
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat a missing IEND chunk as an error
    pub fn require_end(mut self) -> Self {
        self.require_end = true;
        self
    }

    /// Skip the signature check; scanning still starts at offset 8
    pub fn skip_signature_check(mut self) -> Self {
        self.verify_signature = false;
        self
    }
}
