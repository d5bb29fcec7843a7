use log::debug;
use ndarray::{ArrayD, Axis, Dimension, IxDyn};

/// `(dimension name, coordinate label)` pairs picking one scalar out of
/// a multi-dimensional variable
pub type Selection = Vec<(Box<str>, Box<str>)>;

/// Values of one posterior variable with axes `(chain, draw, dims...)`
#[derive(Debug, Clone, PartialEq)]
pub enum VarArray {
    Real(ArrayD<f64>),
    Int(ArrayD<i64>),
}

impl VarArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            VarArray::Real(arr) => arr.shape(),
            VarArray::Int(arr) => arr.shape(),
        }
    }

    fn select_draws(&self, keep: &[usize]) -> Self {
        match self {
            VarArray::Real(arr) => VarArray::Real(arr.select(Axis(1), keep)),
            VarArray::Int(arr) => VarArray::Int(arr.select(Axis(1), keep)),
        }
    }

    fn trace_at(&self, idx: &[usize]) -> TraceValues {
        match self {
            VarArray::Real(arr) => TraceValues::Continuous(flatten_chain_draw(arr, idx)),
            VarArray::Int(arr) => TraceValues::Discrete(flatten_chain_draw(arr, idx)),
        }
    }
}

/// Fix the trailing `idx` dimensions and collect the remaining
/// `(chain, draw)` block chain by chain
fn flatten_chain_draw<A: Copy>(arr: &ArrayD<A>, idx: &[usize]) -> Vec<A> {
    let mut view = arr.view();
    for &i in idx {
        view = view.index_axis_move(Axis(2), i);
    }
    view.iter().copied().collect()
}

/// A posterior variable: values plus names and coordinate labels of
/// the dimensions beyond `(chain, draw)`
#[derive(Debug, Clone, PartialEq)]
pub struct PosteriorVar {
    pub dims: Vec<Box<str>>,
    pub coords: Vec<Vec<Box<str>>>,
    pub values: VarArray,
}

impl PosteriorVar {
    /// Dimensions are named `dim_0, dim_1, ...` with integer coordinates
    pub fn new(values: VarArray) -> anyhow::Result<Self> {
        let shape = values.shape();
        if shape.len() < 2 {
            return Err(anyhow::anyhow!(
                "posterior arrays need (chain, draw) axes, got shape {:?}",
                shape
            ));
        }
        let dims = (0..(shape.len() - 2))
            .map(|k| format!("dim_{}", k).into_boxed_str())
            .collect();
        let coords = shape[2..]
            .iter()
            .map(|&n| (0..n).map(|i| i.to_string().into_boxed_str()).collect())
            .collect();
        Ok(Self {
            dims,
            coords,
            values,
        })
    }

    pub fn real(values: ArrayD<f64>) -> anyhow::Result<Self> {
        Self::new(VarArray::Real(values))
    }

    pub fn int(values: ArrayD<i64>) -> anyhow::Result<Self> {
        Self::new(VarArray::Int(values))
    }

    /// Replace dimension names and coordinate labels
    pub fn with_dims(
        mut self,
        dims: Vec<Box<str>>,
        coords: Vec<Vec<Box<str>>>,
    ) -> anyhow::Result<Self> {
        let extra = &self.values.shape()[2..];
        if dims.len() != extra.len() || coords.len() != extra.len() {
            return Err(anyhow::anyhow!(
                "expected {} dimension names, got {} names and {} coordinate sets",
                extra.len(),
                dims.len(),
                coords.len()
            ));
        }
        for (k, (c, &n)) in coords.iter().zip(extra.iter()).enumerate() {
            if c.len() != n {
                return Err(anyhow::anyhow!(
                    "dimension {} has {} entries but {} coordinates",
                    dims[k],
                    n,
                    c.len()
                ));
            }
        }
        self.dims = dims;
        self.coords = coords;
        Ok(self)
    }

    pub fn num_chains(&self) -> usize {
        self.values.shape()[0]
    }

    pub fn num_draws(&self) -> usize {
        self.values.shape()[1]
    }
}

/// Flattened draws of one scalar, tagged by value kind
#[derive(Debug, Clone, PartialEq)]
pub enum TraceValues {
    Continuous(Vec<f64>),
    Discrete(Vec<i64>),
}

impl TraceValues {
    pub fn len(&self) -> usize {
        match self {
            TraceValues::Continuous(v) => v.len(),
            TraceValues::Discrete(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One scalar trace extracted from a sample collection
#[derive(Debug, Clone, PartialEq)]
pub struct VarTrace {
    pub name: Box<str>,
    pub selection: Selection,
    pub values: TraceValues,
}

impl VarTrace {
    pub fn label(&self) -> Box<str> {
        make_label(&self.name, &self.selection)
    }
}

///
/// Display label of a scalar trace: the variable name, followed by the
/// selected coordinates on a second line
///
/// * `var_name` - variable name
/// * `selection` - `(dim, coord)` pairs
///
pub fn make_label(var_name: &str, selection: &[(Box<str>, Box<str>)]) -> Box<str> {
    if selection.is_empty() {
        return var_name.into();
    }
    let sel = selection
        .iter()
        .map(|(_, coord)| coord.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}\n{}", var_name, sel).into_boxed_str()
}

/// Posterior draws of several variables sharing `(chain, draw)` axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PosteriorSamples {
    vars: Vec<(Box<str>, PosteriorVar)>,
    draws: Vec<usize>,
    n_chains: usize,
}

impl PosteriorSamples {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable; the first one fixes the chain and draw extents
    pub fn add_var(&mut self, name: &str, var: PosteriorVar) -> anyhow::Result<()> {
        if self.get(name).is_some() {
            return Err(anyhow::anyhow!("duplicate variable name: {}", name));
        }

        if self.vars.is_empty() {
            self.n_chains = var.num_chains();
            self.draws = (0..var.num_draws()).collect();
        } else if var.num_chains() != self.n_chains || var.num_draws() != self.draws.len() {
            return Err(anyhow::anyhow!(
                "variable {} has {} chains x {} draws, expected {} x {}",
                name,
                var.num_chains(),
                var.num_draws(),
                self.n_chains,
                self.draws.len()
            ));
        }

        self.vars.push((name.into(), var));
        Ok(())
    }

    /// Builder-style [`Self::add_var`]
    pub fn with_var(mut self, name: &str, var: PosteriorVar) -> anyhow::Result<Self> {
        self.add_var(name, var)?;
        Ok(self)
    }

    /// Override the draw coordinates (default `0..num_draws`)
    pub fn with_draw_coords(mut self, draws: Vec<usize>) -> anyhow::Result<Self> {
        if draws.len() != self.draws.len() {
            return Err(anyhow::anyhow!(
                "{} draw coordinates for {} draws",
                draws.len(),
                self.draws.len()
            ));
        }
        self.draws = draws;
        Ok(self)
    }

    pub fn num_chains(&self) -> usize {
        self.n_chains
    }

    pub fn num_draws(&self) -> usize {
        self.draws.len()
    }

    pub fn draw_coords(&self) -> &[usize] {
        &self.draws
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn var_names(&self) -> Vec<Box<str>> {
        self.vars.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn vars(&self) -> impl Iterator<Item = (&str, &PosteriorVar)> {
        self.vars.iter().map(|(name, var)| (name.as_ref(), var))
    }

    pub fn get(&self, name: &str) -> Option<&PosteriorVar> {
        self.vars
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, var)| var)
    }

    ///
    /// Drop burn-in draws: keep draws whose coordinate is at least
    /// `skip_first`. Returns a filtered copy.
    ///
    pub fn skip_first(&self, skip_first: usize) -> Self {
        if skip_first == 0 {
            return self.clone();
        }

        let keep: Vec<usize> = self
            .draws
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d >= skip_first)
            .map(|(pos, _)| pos)
            .collect();

        debug!(
            "burn-in: keeping {} of {} draws (skip_first = {})",
            keep.len(),
            self.draws.len(),
            skip_first
        );

        let vars = self
            .vars
            .iter()
            .map(|(name, var)| {
                let values = var.values.select_draws(&keep);
                let var = PosteriorVar {
                    dims: var.dims.clone(),
                    coords: var.coords.clone(),
                    values,
                };
                (name.clone(), var)
            })
            .collect();

        Self {
            vars,
            draws: keep.iter().map(|&pos| self.draws[pos]).collect(),
            n_chains: self.n_chains,
        }
    }

    ///
    /// Flatten every variable into scalar traces, combining chains.
    ///
    /// * `var_names` - restrict to these variables, in this order
    ///   (unknown names are an error)
    ///
    pub fn var_iter(&self, var_names: Option<&[Box<str>]>) -> anyhow::Result<Vec<VarTrace>> {
        let selected: Vec<(&str, &PosteriorVar)> = match var_names {
            Some(names) => names
                .iter()
                .map(|name| {
                    self.get(name)
                        .map(|var| (name.as_ref(), var))
                        .ok_or(anyhow::anyhow!("variable not found: {}", name))
                })
                .collect::<anyhow::Result<_>>()?,
            None => self.vars().collect(),
        };

        let mut traces = vec![];
        for (name, var) in selected {
            let extra = &var.values.shape()[2..];

            if extra.is_empty() {
                traces.push(VarTrace {
                    name: name.into(),
                    selection: vec![],
                    values: var.values.trace_at(&[]),
                });
                continue;
            }

            for idx in ndarray::indices(IxDyn(extra)) {
                let idx = idx.slice();
                let selection = idx
                    .iter()
                    .enumerate()
                    .map(|(k, &i)| (var.dims[k].clone(), var.coords[k][i].clone()))
                    .collect();
                traces.push(VarTrace {
                    name: name.into(),
                    selection,
                    values: var.values.trace_at(idx),
                });
            }
        }
        Ok(traces)
    }
}
