//! Streaming extraction of per-document links from a catalog search page.
//!
//! Pages go through the html5ever tokenizer without building a tree. Chunks can be fed as
//! they arrive; the tokenizer keeps any unfinished markup until the next one.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::{debug, trace};

/// Which list items arm the scanner and which hrefs count as documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRules {
    /// Substring of a `li` element's `class` that marks a search hit.
    pub list_marker: String,
    /// Every document href starts with this.
    pub document_prefix: String,
    /// Hrefs containing this point at a collection, not a document.
    pub exclusion: String,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self {
            list_marker: "booklink".to_string(),
            document_prefix: "/ebooks/".to_string(),
            exclusion: "bookshelf".to_string(),
        }
    }
}

impl LinkRules {
    pub fn accepts(&self, href: &str) -> bool {
        href.starts_with(&self.document_prefix) && !href.contains(&self.exclusion)
    }

    fn arms(&self, tag: &Tag) -> bool {
        &*tag.name == "li" && attr(tag, "class").is_some_and(|class| class.contains(&self.list_marker))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    /// Inside a marked list item, waiting for its document anchor.
    Armed,
}

/// Token sink holding the scan state and the links found so far.
struct LinkSink {
    rules: LinkRules,
    state: ScanState,
    links: Vec<String>,
}

impl LinkSink {
    fn on_start_tag(&mut self, tag: &Tag) {
        if self.rules.arms(tag) {
            self.state = ScanState::Armed;
        } else if self.state == ScanState::Armed && &*tag.name == "a" {
            if let Some(href) = attr(tag, "href") {
                if self.rules.accepts(href) {
                    debug!(href, "catalog link");
                    self.links.push(href.to_string());
                    self.state = ScanState::Idle;
                }
            }
        }
    }
}

impl TokenSink for LinkSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) if tag.kind == TagKind::StartTag => {
                self.on_start_tag(&tag);
                // with no tree builder behind it, the tokenizer has to be told where raw text starts
                match &*tag.name {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenSinkResult::RawData(RawKind::Rawtext),
                    "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
                    _ => TokenSinkResult::Continue,
                }
            }
            Token::ParseError(msg) => {
                trace!(line_number, %msg, "markup error");
                TokenSinkResult::Continue
            }
            _ => TokenSinkResult::Continue,
        }
    }
}

/// First value wins when an attribute repeats; the tokenizer drops the later ones.
fn attr<'t>(tag: &'t Tag, name: &str) -> Option<&'t str> {
    tag.attrs.iter().find(|a| &*a.name.local == name).map(|a| &*a.value)
}

pub struct LinkExtractor {
    tokenizer: Tokenizer<LinkSink>,
    input: BufferQueue,
}

impl LinkExtractor {
    pub fn new(rules: LinkRules) -> Self {
        let sink = LinkSink { rules, state: ScanState::Idle, links: Vec::new() };
        Self { tokenizer: Tokenizer::new(sink, TokenizerOpts::default()), input: BufferQueue::new() }
    }

    pub fn state(&self) -> ScanState {
        self.tokenizer.sink.state
    }

    /// Links recorded so far, in document order.
    pub fn links(&self) -> &[String] {
        &self.tokenizer.sink.links
    }

    pub fn feed(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from_slice(chunk));
        // the sink never hands back a script, so this always runs to the end of the input
        let _ = self.tokenizer.feed(&mut self.input);
    }

    /// Ends the scan; an unterminated trailing tag is dropped.
    pub fn finish(mut self) -> Vec<String> {
        let _ = self.tokenizer.feed(&mut self.input);
        self.tokenizer.end();
        std::mem::take(&mut self.tokenizer.sink.links)
    }
}

/// Runs a fresh extractor over a complete document.
pub fn extract_links(html: &str, rules: &LinkRules) -> Vec<String> {
    let mut extractor = LinkExtractor::new(rules.clone());
    extractor.feed(html);
    extractor.finish()
}
