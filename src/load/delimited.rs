use crate::clean::value::CellValue;
use crate::load::RawTable;

/// Reads one delimited file into a header row plus textual cell rows; the
/// cleaning pipeline handles numeric normalization afterwards.
///
/// Records are flexible: short rows are padded with missing cells, long rows
/// truncated to the header width.
pub(crate) fn read_delimited(bytes: &[u8]) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(field.to_owned())
                }
            })
            .collect();
        row.resize(headers.len(), CellValue::Missing);
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

/// French exports commonly use `;`; pick whichever separator dominates the
/// header line.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header_line = bytes.split(|byte| *byte == b'\n').next().unwrap_or_default();
    let semicolons = header_line.iter().filter(|byte| **byte == b';').count();
    let commas = header_line.iter().filter(|byte| **byte == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semicolon_files_are_sniffed() {
        let bytes = b"Source;1. Appels Recus\nTalent Center;100\n";
        let table = read_delimited(bytes).unwrap();
        assert_eq!(table.headers, vec!["Source", "1. Appels Recus"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], CellValue::Text("Talent Center".to_owned()));
    }

    #[test]
    fn comma_files_still_work() {
        let bytes = b"Motif,Impact Motif (%)\nMaladie,\"12,5\"\n";
        let table = read_delimited(bytes).unwrap();
        assert_eq!(table.headers, vec!["Motif", "Impact Motif (%)"]);
        assert_eq!(table.rows[0][1], CellValue::Text("12,5".to_owned()));
    }

    #[test]
    fn short_rows_are_padded() {
        let bytes = b"Service;Taux Absenteisme\nLogistique\n";
        let table = read_delimited(bytes).unwrap();
        assert_eq!(table.rows[0].len(), 2);
        assert!(table.rows[0][1].is_missing());
    }

    #[test]
    fn blank_fields_become_missing() {
        let bytes = b"Mois;Annee\n;2025\n";
        let table = read_delimited(bytes).unwrap();
        assert!(table.rows[0][0].is_missing());
        assert_eq!(table.rows[0][1], CellValue::Text("2025".to_owned()));
    }
}
