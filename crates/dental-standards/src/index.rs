//! Keyword to code lookup built once per catalog.

use std::collections::HashMap;

use dental_model::{TreatmentCode, contains_ignore_case};

/// Precomputed `keyword -> code positions` for the keywords named by the
/// rule tables. Positions follow catalog order (code ascending).
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    entries: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn build<'a, I>(codes: &[TreatmentCode], keywords: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: HashMap<String, Vec<usize>> = HashMap::new();
        for keyword in keywords {
            if keyword.is_empty() {
                continue;
            }
            let key = keyword.to_lowercase();
            if entries.contains_key(&key) {
                continue;
            }
            let positions = codes
                .iter()
                .enumerate()
                .filter(|(_, code)| contains_ignore_case(&code.name, keyword))
                .map(|(idx, _)| idx)
                .collect();
            entries.insert(key, positions);
        }
        Self { entries }
    }

    /// Positions for an indexed keyword; `None` when the keyword was not indexed.
    pub fn lookup(&self, keyword: &str) -> Option<&[usize]> {
        self.entries
            .get(&keyword.to_lowercase())
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_case_insensitively_in_catalog_order() {
        let codes = vec![
            TreatmentCode::new("313000110", "CR充填", 106),
            TreatmentCode::new("313000210", "インレー", 190),
            TreatmentCode::new("313000310", "cr研磨", 20),
        ];
        let index = KeywordIndex::build(&codes, ["CR", "", "cr"]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("Cr"), Some(&[0, 2][..]));
        assert_eq!(index.lookup("インレー"), None);
    }
}
