/// Split text into tokens on Unicode whitespace.
///
/// Tokens are borrowed from `text`; no case folding or stemming is applied, so
/// `Cat` and `cat` are distinct terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t: Vec<&str> = tokenize("  the cat\tsat\non the mat\r\n").collect();
        assert_eq!(t, vec!["the", "cat", "sat", "on", "the", "mat"]);
    }

    #[test]
    fn keeps_case_and_punctuation() {
        let t: Vec<&str> = tokenize("Run, run!").collect();
        assert_eq!(t, vec!["Run,", "run!"]);
    }
}
