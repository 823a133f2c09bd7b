// Allow-list CSV: header row, then `station_id,update_source` rows.
// A row authorizes a full position update only when update_source
// equals the sentinel exactly; anything else is silently ignored.

use std::path::Path;

use radarsite_recon::AllowList;

use crate::error::IoError;
use crate::read_to_string;

/// Update-source value naming this tool as the authorized updater.
pub const DEFAULT_SENTINEL: &str = "HOMR";

pub fn parse_allow_list(text: &str, sentinel: &str) -> Result<AllowList, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut list = AllowList::new();
    for row in reader.records() {
        let row = row.map_err(|e| IoError::Csv(e.to_string()))?;
        if row.len() == 2 && &row[1] == sentinel {
            list.insert(&row[0]);
        }
    }
    Ok(list)
}

pub fn read_allow_list(path: &Path, sentinel: &str) -> Result<AllowList, IoError> {
    parse_allow_list(&read_to_string(path)?, sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_rows_only() {
        let text = "\
station,source
KTLX,HOMR
KOUN,manual
KFDR,homr
KINX,HOMR
";
        let list = parse_allow_list(text, DEFAULT_SENTINEL).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("KTLX"));
        assert!(list.contains("KINX"));
        assert!(!list.contains("KOUN"));
        assert!(!list.contains("KFDR"));
    }

    #[test]
    fn header_never_counts() {
        let list = parse_allow_list("KTLX,HOMR\n", DEFAULT_SENTINEL).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn wrong_column_count_ignored() {
        let text = "id,src\nKTLX,HOMR,extra\nKOUN\nKINX,HOMR\n";
        let list = parse_allow_list(text, DEFAULT_SENTINEL).unwrap();
        assert_eq!(list.len(), 1);
        assert!(list.contains("KINX"));
    }

    #[test]
    fn custom_sentinel() {
        let list = parse_allow_list("id,src\nKTLX,HOMR\nKOUN,NWS\n", "NWS").unwrap();
        assert!(list.contains("KOUN"));
        assert!(!list.contains("KTLX"));
    }

    #[test]
    fn empty_file_is_empty_list() {
        assert!(parse_allow_list("", DEFAULT_SENTINEL).unwrap().is_empty());
    }
}
