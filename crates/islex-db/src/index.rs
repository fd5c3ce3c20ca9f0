use std::collections::HashMap;

use islex_types::Word;
use tracing::info;

/// Lowercased orthography to every word spelled that way.
pub type OrthoIndex = HashMap<String, Vec<Word>>;
/// Phone sequence to every word pronounced that way.
pub type PhoneIndex = HashMap<Vec<String>, Vec<Word>>;

/// Bucket words by lowercased orthography, keeping encounter order.
pub fn index_by_orthography<I>(words: I) -> OrthoIndex
where
    I: IntoIterator<Item = Word>,
{
    let mut index: OrthoIndex = HashMap::new();
    let mut total = 0usize;
    for word in words {
        index
            .entry(word.orthography().to_lowercase())
            .or_default()
            .push(word);
        total += 1;
    }
    info!("indexed {total} words under {} orthographies", index.len());
    index
}

/// Bucket words by the phones of each of their pronunciations.
///
/// A word with several pronunciation variants lands in one bucket per
/// distinct phone sequence, once per bucket.
pub fn index_by_phones<I>(words: I) -> PhoneIndex
where
    I: IntoIterator<Item = Word>,
{
    let mut index: PhoneIndex = HashMap::new();
    let mut total = 0usize;
    for word in words {
        total += 1;
        let mut keys: Vec<Vec<String>> = Vec::with_capacity(word.pronunciations().len());
        for pron in word.pronunciations() {
            let key = phone_key(&pron.ipa());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let Some(last) = keys.pop() else {
            continue;
        };
        for key in keys {
            index.entry(key).or_default().push(word.clone());
        }
        index.entry(last).or_default().push(word);
    }
    info!("indexed {total} words under {} phone sequences", index.len());
    index
}

/// Owned lookup key for a [`PhoneIndex`].
pub fn phone_key<S: AsRef<str>>(phones: &[S]) -> Vec<String> {
    phones.iter().map(|p| p.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_line;

    fn words(lines: &[&str]) -> Vec<Word> {
        lines.iter().map(|l| parse_line(l, false).unwrap()).collect()
    }

    #[test]
    fn buckets_by_lowercase_orthography_in_order() {
        let input = words(&[
            "Read(nnp_surname) # ɹ ˈi d #",
            "read(vb) # ɹ ˈi d #",
            "lead(nn) # l ˈɛ d #",
            "read(vbd) # ɹ ˈɛ d #",
        ]);
        let index = index_by_orthography(input.clone());
        assert_eq!(index.len(), 2);
        let bucket = &index["read"];
        assert_eq!(bucket, &vec![input[0].clone(), input[1].clone(), input[3].clone()]);
        assert!(!index.contains_key("Read"));
    }

    #[test]
    fn buckets_every_pronunciation_variant() {
        let input = words(&[
            "either(cc) # ˈi . ð ɚ # ˈaɪ . ð ɚ #",
            "ether(nn) # ˈi . θ ɚ #",
            "eether(nn) # ˈi . ð ɚ # ˈi . ð ɚ #",
        ]);
        let index = index_by_phones(input.clone());
        assert_eq!(index.len(), 3);

        let ee = &index[&phone_key(&["ˈi", "ð", "ɚ"])];
        assert_eq!(ee.len(), 2);
        assert_eq!(ee[0].orthography(), "either");
        assert_eq!(ee[1].orthography(), "eether");

        let eye = &index[&phone_key(&["ˈaɪ", "ð", "ɚ"])];
        assert_eq!(eye, &vec![input[0].clone()]);
    }

    #[test]
    fn empty_stream_builds_empty_index() {
        assert!(index_by_orthography(Vec::new()).is_empty());
        assert!(index_by_phones(Vec::new()).is_empty());
    }
}
