use narrato::domain::Caption;

#[test]
fn given_messy_whitespace_when_normalizing_then_collapsed_to_single_spaces() {
    let caption = Caption::normalize("  a  dog\n on\tthe beach  ", 200).unwrap();
    assert_eq!(caption.as_str(), "a dog on the beach");
}

#[test]
fn given_blank_text_when_normalizing_then_returns_none() {
    assert!(Caption::normalize("   \n\t ", 200).is_none());
    assert!(Caption::normalize("", 200).is_none());
}

#[test]
fn given_long_text_when_normalizing_then_truncated_on_word_boundary() {
    let caption = Caption::normalize("a small brown dog runs", 13).unwrap();
    assert_eq!(caption.as_str(), "a small brown");
}

#[test]
fn given_single_long_word_when_normalizing_then_hard_truncated() {
    let caption = Caption::normalize("supercalifragilistic", 5).unwrap();
    assert_eq!(caption.as_str(), "super");
}

#[test]
fn given_multibyte_text_when_truncating_then_counts_characters() {
    let caption = Caption::normalize("café crème brûlée", 10).unwrap();
    assert_eq!(caption.as_str(), "café crème");
}
