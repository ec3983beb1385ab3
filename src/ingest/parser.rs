/// One parsed input triple. The input format carries no super column, so
/// every triple lands under a plain column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub row_key: String,
    pub column_name: Vec<u8>,
    pub value: Vec<u8>,
}

/// Parse one input line of the form `rowKey<TAB>columnName<TAB>value`.
///
/// Lines with fewer than 3 tab-separated fields are malformed and yield
/// `None`. Fields past the third are ignored, the value is the third field
/// only.
pub fn parse_line(line: &str) -> Option<Triple> {
    let mut fields = line.split('\t');
    let row_key = fields.next()?;
    let column_name = fields.next()?;
    let value = fields.next()?;

    Some(Triple {
        row_key: row_key.to_string(),
        column_name: column_name.as_bytes().to_vec(),
        value: value.as_bytes().to_vec(),
    })
}
