#![cfg(feature = "io-csv")]

use relcsv::io::compression::{DecompressionCodec, register_codec};
use relcsv::io::csv::CsvSource;
use relcsv::testing::{SUPPLIERS_CSV, TempFilePath, mock_csv_file, mock_config_file, supplier_schema};
use std::io::Read;
use std::sync::Arc;
use relcsv::{CsvOptions, CsvRelation, RecordSource, Relation, RelationConfig, RelCsvError};

fn supplier_config() -> RelationConfig {
    RelationConfig::new(supplier_schema()).with_candidate_keys([["SNO"]])
}

#[tokio::test]
async fn open_plain_file() -> anyhow::Result<()> {
    let f = mock_csv_file(SUPPLIERS_CSV)?;
    let mut rel = CsvRelation::open(f.path(), &supplier_config())?;
    let (stream, _cancel) = rel.tuples()?;
    let tuples = stream.try_collect().await?;
    assert_eq!(tuples.len(), 5);
    assert_eq!(tuples[2].to_string(), "(3, Blake, 30, Paris)");
    Ok(())
}

#[test]
fn quoted_cells_and_headers() -> anyhow::Result<()> {
    let opts = CsvOptions {
        has_headers: true,
        ..CsvOptions::default()
    };
    let data = "SNO,SName,Status,City\n1,\"Smith, J\",20,London\n";
    let mut src = CsvSource::from_reader(data.as_bytes(), &opts);
    assert_eq!(
        src.headers()?,
        Some(vec!["SNO".into(), "SName".into(), "Status".into(), "City".into()])
    );
    let rec = src.read_record()?.expect("one record");
    assert_eq!(rec[1], "Smith, J");
    assert_eq!(src.read_record()?, None);
    Ok(())
}

#[test]
fn dialect_options() -> anyhow::Result<()> {
    let opts = CsvOptions {
        delimiter: b';',
        trim: true,
        comment: Some(b'#'),
        ..CsvOptions::default()
    };
    let data = "# suppliers\n1 ; Smith ;20;London\n";
    let mut src = CsvSource::from_reader(data.as_bytes(), &opts);
    assert_eq!(
        src.read_record()?,
        Some(vec!["1".into(), "Smith".into(), "20".into(), "London".into()])
    );
    assert_eq!(src.read_record()?, None);
    Ok(())
}

#[tokio::test]
async fn ragged_rows_reach_the_parser() -> anyhow::Result<()> {
    let f = mock_csv_file("1,Smith,20,London\n2,Jones\n")?;
    let mut rel = CsvRelation::open(f.path(), &supplier_config())?;
    let (stream, _cancel) = rel.tuples()?;
    let err = stream.try_collect().await.unwrap_err();
    assert!(matches!(err, RelCsvError::FieldMismatch { expected: 4, found: 2 }));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let err = CsvRelation::open("/definitely/not/here.csv", &supplier_config()).unwrap_err();
    assert!(matches!(err, RelCsvError::Io(_)));
}

#[cfg(feature = "compression-gzip")]
#[tokio::test]
async fn open_gzip_by_extension() -> anyhow::Result<()> {
    let f = relcsv::testing::mock_gzip_csv_file(SUPPLIERS_CSV)?;
    let mut rel = CsvRelation::open(f.path(), &supplier_config())?;
    let (stream, _cancel) = rel.tuples()?;
    assert_eq!(stream.try_count().await?, 5);
    Ok(())
}

#[cfg(feature = "compression-zstd")]
#[tokio::test]
async fn open_zstd_by_magic_bytes() -> anyhow::Result<()> {
    let f = relcsv::testing::mock_zstd_file_without_extension(SUPPLIERS_CSV)?;
    let mut rel = CsvRelation::open(f.path(), &supplier_config())?;
    let (stream, _cancel) = rel.tuples()?;
    assert_eq!(stream.try_count().await?, 5);
    Ok(())
}

#[tokio::test]
async fn config_file_drives_the_relation() -> anyhow::Result<()> {
    let data = mock_csv_file("SNO;SName;Status;City\n1;Smith;20;London\n1;Smith;20;London\n")?;
    let cfg = mock_config_file(
        r#"{
            "schema": [
                {"name": "SNO", "kind": "int"},
                {"name": "SName", "kind": "string"},
                {"name": "Status", "kind": "int"},
                {"name": "City", "kind": "string"}
            ],
            "candidate_keys": [["SNO"]],
            "source_distinct": true,
            "channel_capacity": 4,
            "csv": {"delimiter": 59, "has_headers": true}
        }"#,
    )?;
    let config = RelationConfig::from_json_file(cfg.path())?;
    let mut rel = CsvRelation::open(data.path(), &config)?;
    assert!(rel.source_distinct());
    let (stream, _cancel) = rel.tuples()?;
    assert_eq!(stream.try_count().await?, 2);
    Ok(())
}

const XOR_KEY: u8 = 0x5a;

/// Toy codec: every byte XORed with a fixed key.
struct XorCodec;

struct XorReader(Box<dyn Read + Send>);

impl Read for XorReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.0.read(buf)?;
        buf[..n].iter_mut().for_each(|b| *b ^= XOR_KEY);
        Ok(n)
    }
}

impl DecompressionCodec for XorCodec {
    fn name(&self) -> &str {
        "xor"
    }

    fn extensions(&self) -> &[&str] {
        &[".xor"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn wrap_reader(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(XorReader(reader)))
    }
}

#[tokio::test]
async fn registered_codec_is_used_by_extension() -> anyhow::Result<()> {
    register_codec(Arc::new(XorCodec));

    let f = TempFilePath::with_suffix(".csv.xor")?;
    let scrambled = SUPPLIERS_CSV.bytes().map(|b| b ^ XOR_KEY).collect::<Vec<_>>();
    std::fs::write(f.path(), scrambled)?;

    let mut rel = CsvRelation::open(f.path(), &supplier_config())?;
    let (stream, _cancel) = rel.tuples()?;
    let tuples = stream.try_collect().await?;
    assert_eq!(tuples.len(), 5);
    assert_eq!(tuples[4].to_string(), "(5, Adams, 30, Athens)");
    Ok(())
}
