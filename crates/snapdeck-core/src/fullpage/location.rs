//! Deep-link location
//!
//! The deck's address is a URL whose fragment names the section in view
//! (`#<anchor>` or `#section-<n>`). History is kept the way a browser keeps
//! it: replacing rewrites the current entry, pushing appends one.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::Result;

const BASE: &str = "snapdeck://deck/";

#[derive(Debug, Clone)]
pub struct Location {
    entries: Vec<Url>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            entries: vec![base_url()],
        }
    }
}

fn base_url() -> Url {
    Url::parse(BASE).expect("static base url parses")
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given fragment (with or without the leading `#`)
    pub fn with_fragment(fragment: &str) -> Self {
        let mut url = base_url();
        let fragment = fragment.trim_start_matches('#');
        if !fragment.is_empty() {
            url.set_fragment(Some(fragment));
        }
        Self { entries: vec![url] }
    }

    /// Start from a full address, e.g. `snapdeck://deck/#canvas`
    pub fn parse(address: &str) -> Result<Self> {
        let url = Url::parse(address)?;
        Ok(Self { entries: vec![url] })
    }

    /// Current fragment without the `#`, percent-decoded, empty when unset
    pub fn fragment(&self) -> Cow<'_, str> {
        let raw = self.current().fragment().unwrap_or("");
        percent_decode_str(raw).decode_utf8_lossy()
    }

    /// Current fragment with the `#`, as shown to users
    pub fn hash(&self) -> String {
        let fragment = self.fragment();
        if fragment.is_empty() {
            String::new()
        } else {
            format!("#{}", fragment)
        }
    }

    pub fn current(&self) -> &Url {
        // entries is never empty
        &self.entries[self.entries.len() - 1]
    }

    /// Rewrite the current entry's fragment
    pub fn replace(&mut self, fragment: &str) {
        let last = self.entries.len() - 1;
        self.entries[last].set_fragment(Some(fragment.trim_start_matches('#')));
    }

    /// Append a new entry with the given fragment
    pub fn push(&mut self, fragment: &str) {
        let mut url = self.current().clone();
        url.set_fragment(Some(fragment.trim_start_matches('#')));
        self.entries.push(url);
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}
