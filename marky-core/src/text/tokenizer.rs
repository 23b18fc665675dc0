use std::str::SplitWhitespace;

/// Characters closing a sentence when found in the trailing punctuation of a word.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// One word of the input, borrowed from the source text.
///
/// `text` keeps its case and inner punctuation (`don't`, `e-mail`) but never
/// the punctuation surrounding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	/// Word content, stripped of surrounding punctuation.
	pub text: &'a str,
	/// Whether the punctuation stripped after the word closed a sentence.
	pub sentence_end: bool,
}

impl<'a> Token<'a> {
	/// Builds a token from a raw whitespace separated fragment.
	///
	/// Returns `None` if nothing alphanumeric is left once stripped.
	fn from_fragment(fragment: &'a str) -> Option<Self> {
		let is_punctuation = |c: char| !c.is_alphanumeric();
		let head = fragment.len() - fragment.trim_start_matches(is_punctuation).len();
		let text = fragment[head..].trim_end_matches(is_punctuation);
		if text.is_empty() {
			return None;
		}

		let trailing = &fragment[head + text.len()..];
		let sentence_end = trailing.contains(&SENTENCE_TERMINATORS[..]);

		Some(Self { text, sentence_end })
	}
}

/// Lazy sequence of tokens over a text.
///
/// Cloning forks the iterator at its current position. Call [`tokenize`]
/// again to start over.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
	fragments: SplitWhitespace<'a>,
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		self.fragments.by_ref().find_map(Token::from_fragment)
	}
}

/// Splits `text` into word tokens, in input order.
///
/// # Rules
/// - Fragments are separated by whitespace.
/// - Non-alphanumeric characters around each fragment are stripped.
/// - Fragments left empty are dropped.
/// - A `.`, `!` or `?` in the stripped trailing punctuation flags the token
///   as the end of a sentence.
///
/// Pure function: no error case, empty input yields an empty sequence.
pub fn tokenize(text: &str) -> Tokens<'_> {
	Tokens { fragments: text.split_whitespace() }
}
