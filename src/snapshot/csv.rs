//! CSV snapshot codec
//!
//! One stream, three sections:
//!
//! ```text
//! === ACCOUNTS ===
//! id,name,balance
//! 1,Wallet,-50.00
//!
//! === CATEGORIES ===
//! id,type,name
//! 1,EXPENSE,Food
//!
//! === OPERATIONS ===
//! id,type,account_id,category_id,amount,date,description
//! 1,EXPENSE,1,1,50.00,2024-01-10,
//! ```
//!
//! Decoding is forgiving: a record that cannot be parsed is logged and
//! skipped, and the rest of the file is still imported. An empty
//! description field always decodes as no description.

use std::fmt;
use std::io::Write;

use ::csv::{ReaderBuilder, StringRecord};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use super::{strip_bom, Snapshot, SnapshotCodec, SnapshotFormat};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, Money, Operation, OperationId, OperationKind,
};

const ACCOUNTS_HEADER: &str = "id,name,balance";
const CATEGORIES_HEADER: &str = "id,type,name";
const OPERATIONS_HEADER: &str = "id,type,account_id,category_id,amount,date,description";

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Accounts,
    Categories,
    Operations,
}

impl Section {
    fn from_marker(line: &str) -> Option<Option<Self>> {
        let name = line.strip_prefix("=== ")?.strip_suffix(" ===")?;
        Some(match name.trim() {
            "ACCOUNTS" => Some(Self::Accounts),
            "CATEGORIES" => Some(Self::Categories),
            "OPERATIONS" => Some(Self::Operations),
            _ => None,
        })
    }

    fn marker(&self) -> &'static str {
        match self {
            Self::Accounts => "=== ACCOUNTS ===",
            Self::Categories => "=== CATEGORIES ===",
            Self::Operations => "=== OPERATIONS ===",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Accounts => "accounts",
            Self::Categories => "categories",
            Self::Operations => "operations",
        };
        f.write_str(name)
    }
}

/// Why a single record was skipped
#[derive(Debug, Error)]
enum RecordError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("{field} is not a valid ID: {value:?}")]
    InvalidId { field: &'static str, value: String },

    #[error("name is empty")]
    EmptyName,

    #[error("unknown kind {0:?}")]
    UnknownKind(String),

    #[error("{field} is not a valid amount: {value:?}")]
    InvalidMoney { field: &'static str, value: String },

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Money),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("unterminated quoted field")]
    UnterminatedQuote,

    #[error("quote inside an unquoted field")]
    StrayQuote,

    #[error("unreadable record: {0}")]
    Malformed(String),
}

impl SnapshotCodec for CsvCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Csv
    }

    fn encode(&self, snapshot: &Snapshot) -> LedgerResult<Vec<u8>> {
        let mut out = Vec::new();

        writeln!(out, "{}", Section::Accounts.marker())?;
        writeln!(out, "{}", ACCOUNTS_HEADER)?;
        for account in &snapshot.accounts {
            writeln!(
                out,
                "{},{},{}",
                account.id,
                escape_csv(&account.name),
                account.balance
            )?;
        }
        writeln!(out)?;

        writeln!(out, "{}", Section::Categories.marker())?;
        writeln!(out, "{}", CATEGORIES_HEADER)?;
        for category in &snapshot.categories {
            writeln!(
                out,
                "{},{},{}",
                category.id,
                category.kind,
                escape_csv(&category.name)
            )?;
        }
        writeln!(out)?;

        writeln!(out, "{}", Section::Operations.marker())?;
        writeln!(out, "{}", OPERATIONS_HEADER)?;
        for op in &snapshot.operations {
            writeln!(
                out,
                "{},{},{},{},{},{},{}",
                op.id,
                op.kind,
                op.account_id,
                op.category_id,
                op.amount,
                op.date,
                escape_csv(op.description.as_deref().unwrap_or(""))
            )?;
        }

        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> LedgerResult<Snapshot> {
        let text = std::str::from_utf8(strip_bom(bytes))
            .map_err(|e| LedgerError::Format(format!("CSV: input is not UTF-8: {}", e)))?;

        let mut decoder = Decoder::default();
        let mut section: Option<Section> = None;
        let mut pending: Option<PendingRecord> = None;

        // Split on '\n' only: a '\r' inside an open quoted field is content
        for (index, raw) in text.split('\n').enumerate() {
            let line_no = index + 1;

            if let Some(mut record) = pending.take() {
                if Section::from_marker(raw.trim()).is_none() {
                    record.text.push('\n');
                    record.text.push_str(raw);
                    if scan_record(&record.text).open {
                        pending = Some(record);
                    } else {
                        decoder.record(record.section, record.start, record.text.trim_end());
                    }
                    continue;
                }
                // A section marker ends the runaway record; the marker still counts
                decoder.skip(record.section, record.start, RecordError::UnterminatedQuote);
            }

            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(marker) = Section::from_marker(line) {
                section = marker;
                continue;
            }

            if line.starts_with("id,") {
                continue;
            }

            // Content outside a known section is ignored
            let Some(sec) = section else {
                continue;
            };

            // Trailing whitespace may belong to a quoted field left open
            let line = raw.trim_start();
            if scan_record(line).open {
                pending = Some(PendingRecord {
                    start: line_no,
                    section: sec,
                    text: line.to_string(),
                });
            } else {
                decoder.record(sec, line_no, line.trim_end());
            }
        }

        if let Some(record) = pending {
            decoder.skip(record.section, record.start, RecordError::UnterminatedQuote);
        }

        debug!(
            accounts = decoder.snapshot.accounts.len(),
            categories = decoder.snapshot.categories.len(),
            operations = decoder.snapshot.operations.len(),
            skipped = decoder.skipped,
            "decoded CSV snapshot"
        );
        Ok(decoder.snapshot)
    }
}

/// A record whose quoted field runs past the end of its first line
struct PendingRecord {
    start: usize,
    section: Section,
    text: String,
}

#[derive(Default)]
struct Decoder {
    snapshot: Snapshot,
    skipped: usize,
}

impl Decoder {
    fn record(&mut self, section: Section, line_no: usize, text: &str) {
        let result = read_fields(text).and_then(|fields| match section {
            Section::Accounts => parse_account(&fields).map(|a| self.snapshot.accounts.push(a)),
            Section::Categories => {
                parse_category(&fields).map(|c| self.snapshot.categories.push(c))
            }
            Section::Operations => {
                parse_operation(&fields).map(|o| self.snapshot.operations.push(o))
            }
        });

        if let Err(err) = result {
            self.skip(section, line_no, err);
        }
    }

    fn skip(&mut self, section: Section, line_no: usize, err: RecordError) {
        self.skipped += 1;
        warn!(line = line_no, %section, error = %err, "skipping malformed CSV record");
    }
}

/// Quote layout of one record
struct RecordShape {
    /// A quoted field is still open at the end of the text
    open: bool,
    /// A quote appears somewhere other than around a whole field
    stray: bool,
    /// Per field, whether it was written in quotes
    quoted: Vec<bool>,
}

/// A quote opens a field only as its first character; `""` inside quotes is
/// an escaped quote.
fn scan_record(text: &str) -> RecordShape {
    let mut shape = RecordShape {
        open: false,
        stray: false,
        quoted: vec![false],
    };
    let mut at_field_start = true;
    let mut after_close = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if shape.open {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    shape.open = false;
                    after_close = true;
                }
            }
            continue;
        }

        match c {
            ',' => {
                shape.quoted.push(false);
                at_field_start = true;
                after_close = false;
            }
            '"' if at_field_start => {
                shape.open = true;
                at_field_start = false;
                if let Some(last) = shape.quoted.last_mut() {
                    *last = true;
                }
            }
            _ => {
                if c == '"' || after_close {
                    shape.stray = true;
                }
                at_field_start = false;
            }
        }
    }

    shape
}

/// Split one complete record into fields, trimming only unquoted ones
fn read_fields(text: &str) -> Result<StringRecord, RecordError> {
    let shape = scan_record(text);
    if shape.open {
        return Err(RecordError::UnterminatedQuote);
    }
    if shape.stray {
        return Err(RecordError::StrayQuote);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut raw = StringRecord::new();
    match reader.read_record(&mut raw) {
        Ok(true) => {}
        Ok(false) => return Err(RecordError::Malformed("no fields".into())),
        Err(e) => return Err(RecordError::Malformed(e.to_string())),
    }

    let quoted = shape.quoted.iter().copied().chain(std::iter::repeat(false));
    Ok(raw
        .iter()
        .zip(quoted)
        .map(|(value, was_quoted)| if was_quoted { value } else { value.trim() })
        .collect())
}

fn require_fields(fields: &StringRecord, expected: usize) -> Result<(), RecordError> {
    if fields.len() < expected {
        return Err(RecordError::TooFewFields {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

fn field<'r>(fields: &'r StringRecord, index: usize) -> &'r str {
    fields.get(index).unwrap_or("")
}

fn parse_id(fields: &StringRecord, index: usize, name: &'static str) -> Result<u32, RecordError> {
    let value = field(fields, index);
    value.parse().map_err(|_| RecordError::InvalidId {
        field: name,
        value: value.to_string(),
    })
}

fn parse_name(fields: &StringRecord, index: usize) -> Result<String, RecordError> {
    let name = field(fields, index);
    if name.trim().is_empty() {
        return Err(RecordError::EmptyName);
    }
    Ok(name.to_string())
}

fn parse_kind(fields: &StringRecord, index: usize) -> Result<OperationKind, RecordError> {
    let value = field(fields, index);
    OperationKind::parse(value).ok_or_else(|| RecordError::UnknownKind(value.to_string()))
}

fn parse_money(
    fields: &StringRecord,
    index: usize,
    name: &'static str,
) -> Result<Money, RecordError> {
    let value = field(fields, index);
    Money::parse(value).map_err(|_| RecordError::InvalidMoney {
        field: name,
        value: value.to_string(),
    })
}

fn parse_account(fields: &StringRecord) -> Result<Account, RecordError> {
    require_fields(fields, 3)?;
    let id = AccountId::new(parse_id(fields, 0, "id")?);
    let name = parse_name(fields, 1)?;
    let balance = parse_money(fields, 2, "balance")?;
    Ok(Account::new(id, name).with_balance(balance))
}

fn parse_category(fields: &StringRecord) -> Result<Category, RecordError> {
    require_fields(fields, 3)?;
    let id = CategoryId::new(parse_id(fields, 0, "id")?);
    let kind = parse_kind(fields, 1)?;
    let name = parse_name(fields, 2)?;
    Ok(Category::new(id, kind, name))
}

fn parse_operation(fields: &StringRecord) -> Result<Operation, RecordError> {
    require_fields(fields, 7)?;
    let id = OperationId::new(parse_id(fields, 0, "id")?);
    let kind = parse_kind(fields, 1)?;
    let account_id = AccountId::new(parse_id(fields, 2, "account_id")?);
    let category_id = CategoryId::new(parse_id(fields, 3, "category_id")?);

    let amount = parse_money(fields, 4, "amount")?;
    if !amount.is_positive() {
        return Err(RecordError::NonPositiveAmount(amount));
    }

    let date_text = field(fields, 5);
    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
        .map_err(|_| RecordError::InvalidDate(date_text.to_string()))?;

    let description = Some(field(fields, 6))
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    Ok(Operation {
        id,
        kind,
        account_id,
        category_id,
        amount,
        date,
        description,
    })
}

/// Quote a field if it contains a delimiter, quote or line break, or has
/// whitespace at either end
fn escape_csv(s: &str) -> String {
    let needs_quotes = s.contains(',')
        || s.contains('"')
        || s.contains('\n')
        || s.contains('\r')
        || s.trim() != s;
    if needs_quotes {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures;

    fn decode(text: &str) -> Snapshot {
        CsvCodec.decode(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_exact_layout() {
        let text = String::from_utf8(CsvCodec.encode(&fixtures::sample()).unwrap()).unwrap();
        let expected = "\
=== ACCOUNTS ===
id,name,balance
1,Wallet,-50.00
3,\"Savings, joint\",12500.75

=== CATEGORIES ===
id,type,name
1,EXPENSE,Food
2,INCOME,Salary

=== OPERATIONS ===
id,type,account_id,category_id,amount,date,description
1,EXPENSE,1,1,50.00,2024-01-10,
2,INCOME,3,2,12500.75,2024-02-29,\"Bonus \"\"Q1\"\", paid early\"
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_snapshot_still_has_sections() {
        let text = String::from_utf8(CsvCodec.encode(&Snapshot::default()).unwrap()).unwrap();
        assert_eq!(
            text,
            "=== ACCOUNTS ===\nid,name,balance\n\n=== CATEGORIES ===\nid,type,name\n\n\
             === OPERATIONS ===\nid,type,account_id,category_id,amount,date,description\n"
        );
        assert!(decode(&text).is_empty());
    }

    #[test]
    fn test_empty_description_collapses_to_none() {
        let mut snapshot = fixtures::sample();
        snapshot.operations[1].description = Some(String::new());

        let decoded = CsvCodec
            .decode(&CsvCodec.encode(&snapshot).unwrap())
            .unwrap();
        assert_eq!(decoded.operations[1].description, None);
    }

    #[test]
    fn test_bom_crlf_and_blank_lines() {
        let input = "\u{feff}=== ACCOUNTS ===\r\nid,name,balance\r\n\r\n  1,Wallet,10.00  \r\n\r\n";
        let snapshot = decode(input);
        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.accounts[0].name, "Wallet");
        assert_eq!(snapshot.accounts[0].balance, Money::from_cents(1000));
    }

    #[test]
    fn test_malformed_records_are_skipped_individually() {
        let input = "\
=== ACCOUNTS ===
id,name,balance
1,Wallet,0.00
x,Broken,1.00
2,,1.00
3,Card
4,Cash,abc
5,Bank,7.5
=== CATEGORIES ===
id,type,name
1,EXPENSE,Food
2,TRANSFER,Moves
3,income,Salary
=== OPERATIONS ===
id,type,account_id,category_id,amount,date,description
1,EXPENSE,1,1,5.00,2024-01-10,ok
2,EXPENSE,1,1,0.00,2024-01-10,zero
3,EXPENSE,1,1,-1.00,2024-01-10,negative
4,EXPENSE,1,1,1.00,2024-13-40,bad date
5,EXPENSE,1,1,1.00,2024-01-11
6,INCOME,5,3,100,2024-01-12,
";
        let snapshot = decode(input);

        let account_ids: Vec<u32> = snapshot.accounts.iter().map(|a| a.id.get()).collect();
        assert_eq!(account_ids, vec![1, 5]);
        assert_eq!(snapshot.accounts[1].balance, Money::from_cents(750));

        let category_ids: Vec<u32> = snapshot.categories.iter().map(|c| c.id.get()).collect();
        assert_eq!(category_ids, vec![1, 3]);
        assert_eq!(snapshot.categories[1].kind, OperationKind::Income);

        let op_ids: Vec<u32> = snapshot.operations.iter().map(|o| o.id.get()).collect();
        assert_eq!(op_ids, vec![1, 6]);
        assert_eq!(snapshot.operations[0].description.as_deref(), Some("ok"));
        assert_eq!(snapshot.operations[1].description, None);
    }

    #[test]
    fn test_content_outside_known_sections_ignored() {
        let input = "\
stray,line
=== BUDGETS ===
1,ignored,2
=== CATEGORIES ===
1,EXPENSE,Food
";
        let snapshot = decode(input);
        assert!(snapshot.accounts.is_empty());
        assert_eq!(snapshot.categories.len(), 1);
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let mut snapshot = fixtures::sample();
        snapshot.operations[0].description = Some("line one\nline two, \"quoted\"".into());

        let decoded = CsvCodec
            .decode(&CsvCodec.encode(&snapshot).unwrap())
            .unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_unterminated_quote_skips_only_that_record() {
        let input = "\
=== OPERATIONS ===
1,EXPENSE,1,1,5.00,2024-01-10,ok
2,EXPENSE,1,1,5.00,2024-01-10,\"never closed
";
        let snapshot = decode(input);
        assert_eq!(snapshot.operations.len(), 1);
    }

    #[test]
    fn test_stray_quote_mid_file_skips_only_that_record() {
        let input = "\
=== ACCOUNTS ===
id,name,balance
1,Wal\"let,0.00
2,Cash,1.00
3,Card,2.00
=== CATEGORIES ===
id,type,name
1,EXPENSE,Food
=== OPERATIONS ===
id,type,account_id,category_id,amount,date,description
1,EXPENSE,2,1,5.00,2024-01-10,ok
";
        let snapshot = decode(input);

        let account_ids: Vec<u32> = snapshot.accounts.iter().map(|a| a.id.get()).collect();
        assert_eq!(account_ids, vec![2, 3]);
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.operations.len(), 1);
    }

    #[test]
    fn test_open_quote_stops_at_next_section() {
        let input = "\
=== ACCOUNTS ===
1,Wallet,0.00
2,\"Never closed,1.00
3,Card,2.00
=== CATEGORIES ===
1,EXPENSE,Food
=== OPERATIONS ===
1,EXPENSE,1,1,5.00,2024-01-10,ok
";
        let snapshot = decode(input);

        assert_eq!(snapshot.accounts.len(), 1);
        assert_eq!(snapshot.accounts[0].name, "Wallet");
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.operations.len(), 1);
    }

    #[test]
    fn test_surrounding_whitespace_survives_round_trip() {
        let mut snapshot = fixtures::sample();
        snapshot.accounts[0].name = " Wallet ".into();
        snapshot.categories[0].name = "Food  ".into();
        snapshot.operations[0].description = Some("  padded  ".into());

        let text = String::from_utf8(CsvCodec.encode(&snapshot).unwrap()).unwrap();
        assert!(text.contains("1,\" Wallet \",-50.00\n"));

        let decoded = CsvCodec.decode(text.as_bytes()).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_carriage_return_inside_quoted_field_kept() {
        let mut snapshot = fixtures::sample();
        snapshot.operations[0].description = Some("first\r\nsecond".into());

        let decoded = CsvCodec
            .decode(&CsvCodec.encode(&snapshot).unwrap())
            .unwrap();
        assert_eq!(
            decoded.operations[0].description.as_deref(),
            Some("first\r\nsecond")
        );
    }

    #[test]
    fn test_unquoted_fields_are_trimmed() {
        let snapshot = decode("=== CATEGORIES ===\n 4 , income ,  Gifts  \n5,EXPENSE,\"  Rent \"\n");
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(snapshot.categories[0].id, CategoryId::new(4));
        assert_eq!(snapshot.categories[0].name, "Gifts");
        assert_eq!(snapshot.categories[1].name, "  Rent ");
    }

    #[test]
    fn test_invalid_utf8_is_a_format_error() {
        assert!(CsvCodec.decode(&[0xff, 0xfe, 0x00]).unwrap_err().is_format());
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv(" padded"), "\" padded\"");
        assert_eq!(escape_csv("two words"), "two words");
    }
}
