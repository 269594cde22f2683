use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::LedgerEntry;

/// Column titles of the ledger export, in order.
pub const EXPORT_HEADER: [&str; 14] = [
    "TIPO",
    "PREFIJO",
    "NUMERO",
    "FECHA",
    "CUENTA",
    "TERCERO",
    "CENTRO",
    "DETALLE",
    "DEBITO",
    "CREDITO",
    "BASE",
    "USUARIO",
    "NOMBRE TERCERO",
    "NOMBRE CENTRO",
];

/// File name of the export in the user's home directory.
pub const EXPORT_FILE_NAME: &str = "CONTABLE.csv";

/// Where the export goes when no output path is given.
pub fn default_output_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot determine the home directory")?;
    Ok(home.join(EXPORT_FILE_NAME))
}

/// Write ledger lines as CSV, one row per entry after the header.
/// Returns the number of entries written.
pub fn export_entries<W: Write>(entries: &[LedgerEntry], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;

    let mut count = 0;
    for entry in entries {
        csv_writer.write_record(entry.to_record())?;
        count += 1;
    }

    csv_writer.flush()?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentHeader, LedgerProfile, LineBuilder};

    #[test]
    fn test_export_layout() {
        let profile = LedgerProfile::default();
        let builder = LineBuilder::new(&profile, "01/03/2024 10:00");
        let doc = DocumentHeader {
            number: "7".into(),
            date: "2024-03-01".into(),
            third_party_id: "900123".into(),
            third_party_name: "ACME, SAS".into(),
            cost_center_code: "C1".into(),
            cost_center_name: "CENTRO DE COSTOS GENERAL".into(),
        };
        let entries = builder.receipt(&doc, "11050501", 50000);

        let mut out = Vec::new();
        let count = export_entries(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(count, 2);
        assert_eq!(
            lines[0],
            "TIPO,PREFIJO,NUMERO,FECHA,CUENTA,TERCERO,CENTRO,DETALLE,DEBITO,CREDITO,BASE,USUARIO,NOMBRE TERCERO,NOMBRE CENTRO"
        );
        assert_eq!(
            lines[1],
            "RC,_,7,2024-03-01,13050501,900123,C1,RECAUDO POR VENTA SERVICIOS,0,50000,0,SUPERVISOR,\"ACME, SAS\",CENTRO DE COSTOS GENERAL"
        );
        assert_eq!(
            lines[2],
            "RC,_,7,2024-03-01,11050501,900123,C1,RECAUDO POR VENTA SERVICIOS,50000,0,0,SUPERVISOR,\"ACME, SAS\",CENTRO DE COSTOS GENERAL"
        );
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let mut out = Vec::new();
        let count = export_entries(&[], &mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
