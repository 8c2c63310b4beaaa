//! Three-row demo export used by `tally sample` and the end-to-end tests.

use std::fs;
use std::path::Path;

use crate::error::Result;

pub const SAMPLE_CSV: &str = "Data contabile,Valuta,Dare,Avere,Divisa,Causale,Descrizione,Categoria,Tag
12/03/2025,10/03/2025,\"-100,00\",,EUR,VH,Pagamento POS,Ristoranti e bar,
12/03/2025,07/03/2025,\"-30,00\",,EUR,0U,PAGAMENTO VISA,Arte e Cultura,
11/03/2025,11/03/2025,\"-11,50\",,EUR,TE,ADDEBITO DIRETTO,Utenze
";

pub fn write_sample_csv(path: &Path) -> Result<()> {
    fs::write(path, SAMPLE_CSV)?;
    Ok(())
}
