use crate::posterior::{PosteriorSamples, PosteriorVar, VarArray};

use flate2::read::GzDecoder;
use log::info;
use ndarray::{ArrayD, Dimension, IxDyn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

///
/// Open a file for reading, and return a buffered reader
/// * `input_file` - file name--either gzipped or not
///
pub fn open_buf_reader(input_file: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(input_file)
        .map_err(|e| anyhow::anyhow!("failed to open {}: {}", input_file, e))?;
    match Path::new(input_file).extension().and_then(|x| x.to_str()) {
        Some("gz") => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

///
/// Open a file for writing, and return a buffered writer
/// * `output_file` - file name--either gzipped or not
///
pub fn open_buf_writer(output_file: &str) -> anyhow::Result<Box<dyn Write>> {
    if output_file.eq_ignore_ascii_case("stdout") {
        return Ok(Box::new(BufWriter::new(std::io::stdout())));
    }

    let file = File::create(output_file)?;
    match Path::new(output_file).extension().and_then(|x| x.to_str()) {
        Some("gz") => {
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            Ok(Box::new(BufWriter::new(encoder)))
        }
        _ => Ok(Box::new(BufWriter::new(file))),
    }
}

/// `.csv` and `.csv.gz` are comma separated, everything else splits on
/// whitespace
fn is_csv(file: &str) -> bool {
    let lower = file.to_ascii_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".csv.gz")
}

/// Commas inside `[...]` belong to an index, e.g. `theta[0,1]`
fn split_line<'a>(line: &'a str, csv: bool) -> Vec<&'a str> {
    if !csv {
        return line.split_whitespace().collect();
    }
    let mut words = vec![];
    let (mut depth, mut start) = (0_usize, 0);
    for (i, ch) in line.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                words.push(line[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    words.push(line[start..].trim());
    words
}

fn delimiter(file: &str) -> &'static str {
    if is_csv(file) {
        ","
    } else {
        "\t"
    }
}

/// `theta[1,2]` -> `("theta", [1, 2])`, `mu` -> `("mu", [])`
fn parse_column_name(col: &str) -> anyhow::Result<(Box<str>, Vec<usize>)> {
    match (col.find('['), col.strip_suffix(']')) {
        (Some(open), Some(body)) if open > 0 => {
            let index = body[(open + 1)..]
                .split(',')
                .map(|x| {
                    x.trim()
                        .parse::<usize>()
                        .map_err(|_| anyhow::anyhow!("invalid index in column {}", col))
                })
                .collect::<anyhow::Result<Vec<usize>>>()?;
            Ok((col[..open].into(), index))
        }
        (None, None) => Ok((col.into(), vec![])),
        _ => Err(anyhow::anyhow!("malformed column name: {}", col)),
    }
}

struct TraceVarColumns {
    name: Box<str>,
    columns: Vec<(usize, Vec<usize>)>,
}

///
/// Read posterior draws from a wide delimited file.
///
/// The header names a `chain` column, a `draw` column and one column per
/// scalar, e.g. `theta[0,1]`. Variables whose values all parse as
/// integers become discrete variables.
///
/// * `input_file` - `.tsv`, `.txt`, `.csv`, optionally gzipped
///
pub fn read_trace_file(input_file: &str) -> anyhow::Result<PosteriorSamples> {
    let csv = is_csv(input_file);
    let buf = open_buf_reader(input_file)?;

    let mut header: Option<Vec<Box<str>>> = None;
    let mut rows: Vec<Vec<Box<str>>> = vec![];

    for line in buf.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let words: Vec<Box<str>> = split_line(line, csv).into_iter().map(Box::from).collect();
        match header.as_ref().map(|hdr| hdr.len()) {
            None => header = Some(words),
            Some(ncol) => {
                if words.len() != ncol {
                    return Err(anyhow::anyhow!(
                        "{}: row {} has {} fields, header has {}",
                        input_file,
                        rows.len() + 1,
                        words.len(),
                        ncol
                    ));
                }
                rows.push(words);
            }
        }
    }

    let header = header.ok_or(anyhow::anyhow!("{}: empty trace file", input_file))?;
    if rows.is_empty() {
        return Err(anyhow::anyhow!("{}: no draws", input_file));
    }

    let find_col = |name: &str| {
        header
            .iter()
            .position(|h| h.as_ref() == name)
            .ok_or(anyhow::anyhow!("{}: missing `{}` column", input_file, name))
    };
    let chain_col = find_col("chain")?;
    let draw_col = find_col("draw")?;

    // variables in order of first appearance
    let mut vars: Vec<TraceVarColumns> = vec![];
    for (j, col) in header.iter().enumerate() {
        if j == chain_col || j == draw_col {
            continue;
        }
        let (name, index) = parse_column_name(col)?;
        match vars.iter_mut().find(|v| v.name == name) {
            Some(v) => v.columns.push((j, index)),
            None => vars.push(TraceVarColumns {
                name,
                columns: vec![(j, index)],
            }),
        }
    }

    let parse_id = |x: &str| {
        x.parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{}: invalid chain/draw id {}", input_file, x))
    };

    let mut chain_draw = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        chain_draw.push((parse_id(&row[chain_col])?, parse_id(&row[draw_col])?));
    }

    let chains: Vec<usize> = chain_draw
        .iter()
        .map(|&(c, _)| c)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let draws: Vec<usize> = chain_draw
        .iter()
        .map(|&(_, d)| d)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let chain_pos: HashMap<usize, usize> =
        chains.iter().enumerate().map(|(i, &c)| (c, i)).collect();
    let draw_pos: HashMap<usize, usize> = draws.iter().enumerate().map(|(i, &d)| (d, i)).collect();

    let (n_chains, n_draws) = (chains.len(), draws.len());
    let mut seen = vec![false; n_chains * n_draws];
    let mut row_at = vec![0usize; n_chains * n_draws];
    for (r, &(c, d)) in chain_draw.iter().enumerate() {
        let k = chain_pos[&c] * n_draws + draw_pos[&d];
        if seen[k] {
            return Err(anyhow::anyhow!(
                "{}: duplicate row for chain {} draw {}",
                input_file,
                c,
                d
            ));
        }
        seen[k] = true;
        row_at[k] = r;
    }
    if seen.iter().any(|s| !s) {
        return Err(anyhow::anyhow!(
            "{}: every chain needs the same set of draws",
            input_file
        ));
    }

    let mut samples = PosteriorSamples::new();

    for var in vars.iter() {
        let ndim = var.columns[0].1.len();
        if var.columns.iter().any(|(_, ix)| ix.len() != ndim) {
            return Err(anyhow::anyhow!(
                "{}: inconsistent number of indices for {}",
                input_file,
                var.name
            ));
        }

        let mut extra = vec![0usize; ndim];
        for (_, ix) in var.columns.iter() {
            for (e, &i) in extra.iter_mut().zip(ix.iter()) {
                *e = (*e).max(i + 1);
            }
        }
        let distinct: HashSet<&Vec<usize>> = var.columns.iter().map(|(_, ix)| ix).collect();
        if distinct.len() != var.columns.len()
            || extra.iter().product::<usize>() != var.columns.len()
        {
            return Err(anyhow::anyhow!(
                "{}: {} does not have a column for every index",
                input_file,
                var.name
            ));
        }

        let mut shape = vec![n_chains, n_draws];
        shape.extend_from_slice(&extra);

        let is_discrete = var
            .columns
            .iter()
            .all(|&(j, _)| rows.iter().all(|row| row[j].parse::<i64>().is_ok()));

        let values = if is_discrete {
            VarArray::Int(fill_array(&shape, var, &rows, &row_at, |x| {
                x.parse::<i64>().ok()
            })?)
        } else {
            VarArray::Real(fill_array(&shape, var, &rows, &row_at, |x| {
                x.parse::<f64>().ok()
            })?)
        };

        samples.add_var(&var.name, PosteriorVar::new(values)?)?;
    }

    let samples = samples.with_draw_coords(draws)?;

    info!(
        "read {} variables, {} chains x {} draws from {}",
        samples.num_vars(),
        samples.num_chains(),
        samples.num_draws(),
        input_file
    );

    Ok(samples)
}

fn fill_array<A, F>(
    shape: &[usize],
    var: &TraceVarColumns,
    rows: &[Vec<Box<str>>],
    row_at: &[usize],
    parse: F,
) -> anyhow::Result<ArrayD<A>>
where
    A: Clone + Default,
    F: Fn(&str) -> Option<A>,
{
    let (n_chains, n_draws) = (shape[0], shape[1]);
    let mut arr = ArrayD::<A>::default(IxDyn(shape));
    for c in 0..n_chains {
        for d in 0..n_draws {
            let row = &rows[row_at[c * n_draws + d]];
            for (j, ix) in var.columns.iter() {
                let mut full = vec![c, d];
                full.extend_from_slice(ix);
                arr[full.as_slice()] = parse(&row[*j]).ok_or_else(|| {
                    anyhow::anyhow!("cannot parse `{}` for {}", row[*j], var.name)
                })?;
            }
        }
    }
    Ok(arr)
}

///
/// Write posterior draws as a wide table, comma separated for `.csv`
/// and tab separated otherwise (gzipped if the file name ends with
/// `.gz`). Real values are written so that they read back as real
/// values.
///
pub fn write_trace_file(samples: &PosteriorSamples, output_file: &str) -> anyhow::Result<()> {
    let mut header: Vec<String> = vec!["chain".into(), "draw".into()];
    let mut columns: Vec<(&VarArray, Vec<usize>)> = vec![];

    for (name, var) in samples.vars() {
        let extra = &var.values.shape()[2..];
        if extra.is_empty() {
            header.push(name.to_string());
            columns.push((&var.values, vec![]));
            continue;
        }
        for idx in ndarray::indices(IxDyn(extra)) {
            let idx = idx.slice().to_vec();
            let label = idx
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(",");
            header.push(format!("{}[{}]", name, label));
            columns.push((&var.values, idx));
        }
    }

    let delim = delimiter(output_file);
    let mut buf = open_buf_writer(output_file)?;
    writeln!(buf, "{}", header.join(delim))?;

    for c in 0..samples.num_chains() {
        for (d_pos, d) in samples.draw_coords().iter().enumerate() {
            let mut line = vec![c.to_string(), d.to_string()];
            for (values, idx) in columns.iter() {
                let mut full = vec![c, d_pos];
                full.extend_from_slice(idx);
                let cell = match values {
                    VarArray::Real(arr) => format!("{:?}", arr[full.as_slice()]),
                    VarArray::Int(arr) => arr[full.as_slice()].to_string(),
                };
                line.push(cell);
            }
            writeln!(buf, "{}", line.join(delim))?;
        }
    }
    buf.flush()?;
    Ok(())
}
