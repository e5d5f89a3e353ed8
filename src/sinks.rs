//! Accumulators writing the records of a run to stdout.
//!
//! | format  | sink               | output                                             |
//! |---------|--------------------|----------------------------------------------------|
//! | `line`  | `LineProtocolSink` | one InfluxDB line protocol line per record         |
//! | `json`  | `JsonSink`         | one JSON object per line                           |
//! | `table` | `TableSink`        | buffered, printed as a single table once per run   |
//!
//! Errors never reach the output, they are logged.

use comfy_table::{
    presets,
    Attribute,
    Cell,
    CellAlignment,
    Color,
    ContentArrangement,
    Table,
};
use std::{
    io::{
        self,
        Stdout,
        Write,
    },
    sync::{
        Mutex,
        PoisonError,
    },
};
use twitch_stats_gatherer::{
    Accumulator,
    GatherError,
    MetricRecord,
};

fn report_error(error: GatherError) {
    error!(scope = %error.scope(), "{error}");
}

fn write_out<W: Write>(out: &Mutex<W>, text: &str) {
    let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(err) = out.write_all(text.as_bytes()) {
        error!("failed to write output: {err}");
    }
}

fn flush_out<W: Write>(out: &Mutex<W>) {
    if let Err(err) = out.lock().unwrap_or_else(PoisonError::into_inner).flush() {
        error!("failed to flush output: {err}");
    }
}

/// Backslash-escapes every char of `special`.
fn escape(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Renders a record as InfluxDB line protocol with nanosecond precision. Tags with an empty value are left out,
/// line protocol has no representation for them.
pub fn line_protocol(record: &MetricRecord) -> String {
    let mut line = escape(record.name, &[',', ' ']);

    for (key, value) in record.tag_map() {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&escape(value, &[',', '=', ' ']));
    }

    let fields = record
        .field_map()
        .into_iter()
        .map(|(key, value)| format!("{}={value}i", escape(key, &[',', '=', ' '])))
        .collect::<Vec<_>>()
        .join(",");
    line.push(' ');
    line.push_str(&fields);

    line.push(' ');
    line.push_str(&record.timestamp.timestamp_nanos_opt().unwrap_or_default().to_string());
    line
}

pub struct LineProtocolSink<W = Stdout> {
    out: Mutex<W>,
}

impl LineProtocolSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LineProtocolSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Accumulator for LineProtocolSink<W> {
    fn add_record(&self, record: MetricRecord) {
        write_out(&self.out, &format!("{}\n", line_protocol(&record)));
    }

    fn add_error(&self, error: GatherError) {
        report_error(error);
    }

    fn flush(&self) {
        flush_out(&self.out);
    }
}

pub struct JsonSink<W = Stdout> {
    out: Mutex<W>,
}

impl JsonSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Accumulator for JsonSink<W> {
    fn add_record(&self, record: MetricRecord) {
        match serde_json::to_string(&record) {
            Ok(json) => write_out(&self.out, &format!("{json}\n")),
            Err(err) => error!(login = %record.tags.login, "failed to serialize record: {err}"),
        }
    }

    fn add_error(&self, error: GatherError) {
        report_error(error);
    }

    fn flush(&self) {
        flush_out(&self.out);
    }
}

/// Buffers the records of a run and prints them sorted by login on flush.
pub struct TableSink<W = Stdout> {
    records: Mutex<Vec<MetricRecord>>,
    out: Mutex<W>,
}

impl TableSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TableSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            records: Mutex::default(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn render_table(records: &[MetricRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            [
                "Login",
                "Display Name",
                "ID",
                "Followers",
                "Following",
                "Streams",
                "Stream Viewers",
                "Videos",
                "Video Views",
            ]
            .map(|title| Cell::new(title).add_attribute(Attribute::Bold).fg(Color::Cyan)),
        );

    for record in records {
        let f = &record.fields;
        let live = if f.streams > 0 { Color::Green } else { Color::Reset };
        let number = |value: u64| Cell::new(value).set_alignment(CellAlignment::Right);
        table.add_row(vec![
            Cell::new(&record.tags.login).add_attribute(Attribute::Bold),
            Cell::new(&record.tags.display_name),
            Cell::new(&record.tags.id),
            number(f.followers),
            number(f.following),
            number(f.streams).fg(live),
            number(f.streams_total_viewers).fg(live),
            number(f.videos),
            number(f.videos_total_viewers),
        ]);
    }
    table
}

impl<W: Write + Send> Accumulator for TableSink<W> {
    fn add_record(&self, record: MetricRecord) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(record);
    }

    fn add_error(&self, error: GatherError) {
        report_error(error);
    }

    fn flush(&self) {
        let mut records = std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner));
        if records.is_empty() {
            return;
        }
        records.sort_by(|a, b| a.tags.login.cmp(&b.tags.login));
        write_out(&self.out, &format!("{}\n", render_table(&records)));
        flush_out(&self.out);
    }
}
