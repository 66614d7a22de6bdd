use std::collections::HashMap;
use std::fmt::{self, Display};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dfilter::{
    eval, CmpOp, EvalError, FtypeError, LocalTimePolicy, Node, RangeList, RangeSpec, Registry,
    RuntimeConfig, Value, ValueKind,
};
use itertools::Itertools;
use slog::{debug, o, Drain, Level, Logger};

/// Probe the filter value types from the command line
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// log more (-v debug, -vv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// print results as json
    #[clap(long, global = true)]
    json: bool,

    /// how to read absolute times that occur twice locally: reject, earliest or latest
    #[clap(long, default_value_t = LocalTimePolicy::Reject, global = true)]
    local_time: LocalTimePolicy,

    /// deepest test nesting to evaluate
    #[clap(long, default_value_t = 512, global = true)]
    max_depth: usize,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// parse a literal as the given kind and print its canonical form
    Parse { kind: ValueKind, text: String },
    /// evaluate `<lhs> <op> <rhs>` with both sides parsed as the given kind
    Compare {
        kind: ValueKind,
        lhs: String,
        op: CmpOp,
        rhs: String,
    },
    /// slice hex bytes (aa:bb:cc) with range specs like 0:2, 1-3, 2: or 4
    Range {
        bytes: String,
        #[clap(required = true, allow_hyphen_values = true, value_parser = parse_range_spec)]
        specs: Vec<RangeSpec>,
    },
    /// list registered value kinds
    Kinds,
}

fn parse_range_spec(s: &str) -> Result<RangeSpec, String> {
    let offset = |t: &str| {
        t.parse::<i32>()
            .map_err(|e| format!("bad offset '{t}' in range '{s}': {e}"))
    };

    if let Some((start, rest)) = s.split_once(':') {
        return Ok(if rest.is_empty() {
            RangeSpec::to_the_end(offset(start)?)
        } else {
            RangeSpec::with_length(offset(start)?, offset(rest)?)
        });
    }
    // skip a leading sign so "-3" is a start offset rather than a range
    match s.get(1..).and_then(|tail| tail.find('-')) {
        Some(i) => Ok(RangeSpec::with_end_offset(
            offset(&s[..=i])?,
            offset(&s[i + 2..])?,
        )),
        None => Ok(RangeSpec::with_length(offset(s)?, 1)),
    }
}

#[cfg_attr(feature = "json", derive(serde::Serialize))]
struct ParseOutcome {
    kind: ValueKind,
    value: Value,
    text: String,
}

impl Display for ParseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.text)
    }
}

#[cfg_attr(feature = "json", derive(serde::Serialize))]
struct CompareOutcome {
    kind: ValueKind,
    expr: String,
    result: bool,
}

impl Display for CompareOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.kind, self.expr, self.result)
    }
}

#[cfg_attr(feature = "json", derive(serde::Serialize))]
struct RangeOutcome {
    ranges: Vec<RangeSpec>,
    total_length: Option<i32>,
    min_start_offset: i32,
    max_start_offset: i32,
    slice: Option<String>,
}

impl Display for RangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ranges:    {}", self.ranges.iter().join(","))?;
        match self.total_length {
            Some(len) => writeln!(f, "length:    {len}")?,
            None => writeln!(f, "length:    (runs to end)")?,
        }
        writeln!(
            f,
            "start:     {}..={}",
            self.min_start_offset, self.max_start_offset
        )?;
        match &self.slice {
            Some(slice) => write!(f, "slice:     {slice}"),
            None => write!(f, "slice:     (out of bounds)"),
        }
    }
}

#[cfg_attr(feature = "json", derive(serde::Serialize))]
struct KindInfo {
    id: usize,
    name: &'static str,
    pretty_name: &'static str,
    text_form: bool,
    ops: Vec<CmpOp>,
}

#[cfg_attr(feature = "json", derive(serde::Serialize), serde(transparent))]
struct KindsOutcome(Vec<KindInfo>);

impl Display for KindsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.0.iter().map(|k| {
            format!(
                "{:>2} {:<14} {:<17} {:<7} {}",
                k.id,
                k.name,
                k.pretty_name,
                if k.text_form { "literal" } else { "-" },
                k.ops.iter().join(" ")
            )
        });
        write!(f, "{}", rows.format("\n"))
    }
}

#[cfg(feature = "json")]
fn emit<T: serde::Serialize + Display>(json: bool, outcome: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        println!("{outcome}");
    }
    Ok(())
}

#[cfg(not(feature = "json"))]
fn emit<T: Display>(json: bool, outcome: &T) -> anyhow::Result<()> {
    if json {
        anyhow::bail!("dftest was built without the json feature");
    }
    println!("{outcome}");
    Ok(())
}

fn literal(registry: &Registry, value: Value) -> Node {
    match value {
        Value::Integer(v) => Node::integer(registry, v),
        other => Node::literal(registry, other),
    }
}

fn run(args: Args, logger: &Logger) -> anyhow::Result<()> {
    let config = RuntimeConfig {
        local_time: args.local_time,
        max_depth: args.max_depth,
    };
    let registry = Registry::with_config(config, logger.new(o!("component" => "registry")));
    debug!(logger, "registry ready"; "local_time" => %config.local_time, "max_depth" => config.max_depth);

    match args.command {
        Command::Parse { kind, text } => {
            let value = registry.from_text(kind, &text)?;
            let text = value.to_string();
            emit(args.json, &ParseOutcome { kind, value, text })
        }
        Command::Compare { kind, lhs, op, rhs } => {
            let lhs = registry.from_text(kind, &lhs)?;
            let rhs = registry.from_text(kind, &rhs)?;
            let tree = Node::test_binary(
                &registry,
                op.into(),
                literal(&registry, lhs),
                literal(&registry, rhs),
            );
            let no_fields: HashMap<String, Vec<Value>> = HashMap::new();
            let result = eval(logger, &registry, &tree, &no_fields)?;
            emit(
                args.json,
                &CompareOutcome {
                    kind,
                    expr: tree.to_string(),
                    result,
                },
            )
        }
        Command::Range { bytes, specs } => {
            let data = registry.from_text(ValueKind::Bytes, &bytes)?;
            let list: RangeList = specs.into_iter().collect();
            let slice = data
                .as_bytes()
                .and_then(|b| list.apply(b))
                .map(|b| Value::Bytes(b).to_string());
            emit(
                args.json,
                &RangeOutcome {
                    ranges: list.iter().copied().collect(),
                    total_length: list.has_total_length().then(|| list.total_length()),
                    min_start_offset: list.min_start_offset(),
                    max_start_offset: list.max_start_offset(),
                    slice,
                },
            )
        }
        Command::Kinds => {
            let kinds = registry
                .kinds()
                .map(|d| KindInfo {
                    id: d.kind().id(),
                    name: d.name(),
                    pretty_name: d.pretty_name(),
                    text_form: d.has_text_form(),
                    ops: CmpOp::ALL.into_iter().filter(|op| d.supports(*op)).collect(),
                })
                .collect();
            emit(args.json, &KindsOutcome(kinds))
        }
    }
}

pub fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::Info,
        1 => Level::Debug,
        _ => Level::Trace,
    };
    let decorator = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let logger = Logger::root(slog::LevelFilter::new(drain, level).fuse(), o!());

    match run(args, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(e) = err.downcast_ref::<FtypeError>() {
                eprintln!("{:?}", miette::Report::new(e.clone()));
            } else if let Some(e) = err.downcast_ref::<EvalError>() {
                eprintln!("{:?}", miette::Report::new(e.clone()));
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
