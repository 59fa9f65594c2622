//! In-progress element sequence and committed Morse buffer

use heapless::String;
use crate::codec;
use crate::observer::KeyerObserver;
use crate::types::Element;

/// Word separator as stored in the buffer, keeping groups space-delimited
const BUFFER_WORD_SEPARATOR: &str = "/ ";

/// Default capacity of the pending sequence, in elements
pub const SEQUENCE_CAPACITY: usize = 32;

/// Default capacity of the committed buffer, in bytes
pub const BUFFER_CAPACITY: usize = 256;

/// Elements typed since the last commit, plus the committed text.
///
/// `buffer` holds space-terminated element groups and `/ ` word tokens,
/// e.g. `"-.-. --.- / "`. `sequence` never holds a word separator. When the
/// buffer is full the oldest groups are evicted to make room; size `BUF` for
/// the longest session that must be kept whole.
#[derive(Debug, Default)]
pub struct SequenceBuffer<const SEQ: usize = SEQUENCE_CAPACITY, const BUF: usize = BUFFER_CAPACITY> {
    sequence: String<SEQ>,
    buffer: String<BUF>,
}

impl<const SEQ: usize, const BUF: usize> SequenceBuffer<SEQ, BUF> {
    pub const fn new() -> Self {
        Self {
            sequence: String::new(),
            buffer: String::new(),
        }
    }

    /// Elements not yet committed
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    /// Committed groups and word separators
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn has_pending(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Append an element to the pending sequence.
    ///
    /// Returns false if the sequence is full and the element was not added.
    pub fn add_element(&mut self, element: Element) -> bool {
        self.sequence.push(element.symbol()).is_ok()
    }

    /// Append an element, first committing a full sequence as its own group.
    ///
    /// The overlong group decodes as unknown, but every element keyed ends up
    /// in the buffer.
    pub fn push_element<O: KeyerObserver>(&mut self, element: Element, observer: &mut O) {
        if self.add_element(element) {
            return;
        }
        #[cfg(feature = "defmt")]
        defmt::warn!("sequence full, committing before {}", element);
        self.commit_character(observer);
        self.add_element(element);
    }

    /// Move the pending sequence into the buffer followed by a space.
    ///
    /// Returns the committed code, or `None` if nothing was pending.
    pub fn commit_sequence(&mut self) -> Option<String<SEQ>> {
        if self.sequence.is_empty() {
            return None;
        }
        let code = core::mem::take(&mut self.sequence);
        self.append(&[code.as_str(), " "]);
        Some(code)
    }

    /// Commit any pending sequence, then append the word separator unless the
    /// buffer already ends with one.
    ///
    /// Returns true if a separator was appended.
    pub fn add_word_separator(&mut self) -> bool {
        self.commit_sequence();
        if self.buffer.ends_with(BUFFER_WORD_SEPARATOR) {
            return false;
        }
        self.append(&[BUFFER_WORD_SEPARATOR]);
        true
    }

    /// Reset both sequence and buffer
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.buffer.clear();
    }

    /// Decode the committed buffer to text
    pub fn decoded(&self) -> String<BUF> {
        let mut text = String::new();
        // Decoded text is never longer than the Morse it came from
        let _ = codec::decode_into(self.buffer.split(' '), &mut text);
        text
    }

    /// Append to the buffer, evicting the oldest groups until `parts` fit
    fn append(&mut self, parts: &[&str]) {
        let needed: usize = parts.iter().map(|part| part.len()).sum();
        if needed > BUF {
            return;
        }
        while self.buffer.len() + needed > BUF {
            #[cfg(feature = "defmt")]
            defmt::warn!("buffer full, evicting oldest group");
            let cut = match self.buffer.find(' ') {
                Some(index) => index + 1,
                None => self.buffer.len(),
            };
            let mut kept: String<BUF> = String::new();
            let _ = kept.push_str(&self.buffer[cut..]);
            self.buffer = kept;
        }
        for part in parts {
            let _ = self.buffer.push_str(part);
        }
    }

    /// Commit the pending sequence as a character and notify the observer.
    ///
    /// Used when a character gap of silence has elapsed. Returns true if a
    /// character was committed.
    pub fn commit_character<O: KeyerObserver>(&mut self, observer: &mut O) -> bool {
        match self.commit_sequence() {
            Some(code) => {
                observer.character_committed(&code, codec::decode_or_unknown(&code));
                self.notify_buffer(observer);
                true
            }
            None => false,
        }
    }

    /// Commit the pending character, then add a word separator, notifying the observer.
    ///
    /// Used when a word gap of silence has elapsed.
    pub fn commit_word<O: KeyerObserver>(&mut self, observer: &mut O) {
        self.commit_character(observer);
        if self.add_word_separator() {
            observer.word_separator_added();
            self.notify_buffer(observer);
        }
    }

    /// Report the current buffer and its decoding
    pub fn notify_buffer<O: KeyerObserver>(&self, observer: &mut O) {
        observer.buffer_updated(&self.buffer, &self.decoded());
    }
}
