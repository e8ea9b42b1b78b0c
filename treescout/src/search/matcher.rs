/// The four literal matching strategies, selected once per run from the
/// `match_case` and `match_full_word` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Whole words (or a whole phrase), case-sensitive
    FullCase,
    /// Whole words (or a whole phrase), case-insensitive
    FullIgnoreCase,
    /// Any word containing a search token, case-sensitive
    PartialCase,
    /// Any word containing a search token, case-insensitive
    PartialIgnoreCase,
}

impl MatchMode {
    /// Selects the mode for a pair of configuration flags
    pub fn from_flags(match_case: bool, match_full_word: bool) -> Self {
        match (match_case, match_full_word) {
            (true, true) => Self::FullCase,
            (false, true) => Self::FullIgnoreCase,
            (true, false) => Self::PartialCase,
            (false, false) => Self::PartialIgnoreCase,
        }
    }

    /// Returns every fragment of `line` that matches `search`.
    ///
    /// The search text is always literal. An empty result means no match.
    pub fn find_matches(&self, line: &str, search: &str) -> Vec<String> {
        match self {
            Self::FullCase => match_full(line, search),
            Self::FullIgnoreCase => match_full(&line.to_lowercase(), &search.to_lowercase()),
            Self::PartialCase => {
                let tokens: Vec<&str> = search.split_whitespace().collect();
                match_partial(line, &tokens, false)
            }
            Self::PartialIgnoreCase => {
                let search = search.to_lowercase();
                let tokens: Vec<&str> = search.split_whitespace().collect();
                match_partial(line, &tokens, true)
            }
        }
    }
}

fn is_phrase(search: &str) -> bool {
    search.split_whitespace().nth(1).is_some()
}

fn match_full(line: &str, search: &str) -> Vec<String> {
    if is_phrase(search) {
        return match_phrase(line, search);
    }
    line.split_whitespace()
        .filter(|word| *word == search)
        .map(str::to_string)
        .collect()
}

fn match_phrase(line: &str, phrase: &str) -> Vec<String> {
    if line.contains(phrase) {
        vec![phrase.to_string()]
    } else {
        Vec::new()
    }
}

/// `tokens` must already be lower-cased when `ignore_case` is set.
fn match_partial(line: &str, tokens: &[&str], ignore_case: bool) -> Vec<String> {
    let mut matches = Vec::new();
    for word in line.split_whitespace() {
        let folded;
        let haystack = if ignore_case {
            folded = word.to_lowercase();
            folded.as_str()
        } else {
            word
        };
        for token in tokens {
            if haystack.contains(token) {
                matches.push(word.to_string());
            }
        }
    }
    matches
}

/// A match mode bound to one search string.
///
/// The lower-cased search text and its tokens are computed once, so scanning a
/// line only does work on the line side. Results are identical to
/// [`MatchMode::find_matches`].
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    mode: MatchMode,
    search: String,
    tokens: Vec<String>,
    phrase: bool,
}

impl PatternMatcher {
    /// Creates a new PatternMatcher for the given mode and search text
    pub fn new(mode: MatchMode, search: impl Into<String>) -> Self {
        let search = search.into();
        let search = match mode {
            MatchMode::FullIgnoreCase | MatchMode::PartialIgnoreCase => search.to_lowercase(),
            MatchMode::FullCase | MatchMode::PartialCase => search,
        };
        let tokens = search.split_whitespace().map(str::to_string).collect();
        let phrase = is_phrase(&search);
        Self {
            mode,
            search,
            tokens,
            phrase,
        }
    }

    /// Gets the mode this matcher was built for
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Finds all matching fragments in the given line
    pub fn find_matches(&self, line: &str) -> Vec<String> {
        match self.mode {
            MatchMode::FullCase => self.match_full(line),
            MatchMode::FullIgnoreCase => self.match_full(&line.to_lowercase()),
            MatchMode::PartialCase | MatchMode::PartialIgnoreCase => {
                let tokens: Vec<&str> = self.tokens.iter().map(String::as_str).collect();
                match_partial(
                    line,
                    &tokens,
                    self.mode == MatchMode::PartialIgnoreCase,
                )
            }
        }
    }

    fn match_full(&self, line: &str) -> Vec<String> {
        if self.phrase {
            match_phrase(line, &self.search)
        } else {
            line.split_whitespace()
                .filter(|word| *word == self.search)
                .map(str::to_string)
                .collect()
        }
    }
}
