use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// First four-digit run of a free-form published date ("c. 1972", "1993-10").
regex!(YEAR_REGEX, r"\d{4}");
// Optional header row of the server book list.
regex!(CSV_HEADER_REGEX, r"(?i)^book[,\s]*isbn$");
