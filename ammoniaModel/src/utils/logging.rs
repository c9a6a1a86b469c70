use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{warn, Level};
use tracing_subscriber::{prelude::*, EnvFilter};
use tracing_timing::{Builder, Histogram};

// Histogram range: 1 ns to 60 s at 3 significant digits
const HISTOGRAM_MAX_NS: u64 = 60_000_000_000;
const HISTOGRAM_SIGFIG: u8 = 3;

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OperationCategory {
    Evaluation { subcategory: EvaluationSubcategory },
    Optimization { subcategory: OptimizationSubcategory },
    FileIO { subcategory: FileIOSubcategory },
    Other,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum EvaluationSubcategory {
    Production,
    Transport,
    Assembly,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum OptimizationSubcategory {
    ModelBuild,
    Solve,
}

#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub enum FileIOSubcategory {
    ParameterLoad,
    TableLoad,
    ProfileLoad,
    ResultsSave,
}

impl OperationCategory {
    pub fn as_str(&self) -> String {
        match self {
            OperationCategory::Evaluation { subcategory } => {
                format!("Evaluation - {}", match subcategory {
                    EvaluationSubcategory::Production => "Production",
                    EvaluationSubcategory::Transport => "Transport",
                    EvaluationSubcategory::Assembly => "Assembly",
                })
            }
            OperationCategory::Optimization { subcategory } => {
                format!("Optimization - {}", match subcategory {
                    OptimizationSubcategory::ModelBuild => "Model Build",
                    OptimizationSubcategory::Solve => "Solve",
                })
            }
            OperationCategory::FileIO { subcategory } => {
                format!("File I/O - {}", match subcategory {
                    FileIOSubcategory::ParameterLoad => "Parameter Load",
                    FileIOSubcategory::TableLoad => "Table Load",
                    FileIOSubcategory::ProfileLoad => "Profile Load",
                    FileIOSubcategory::ResultsSave => "Results Save",
                })
            }
            OperationCategory::Other => "Other Operations".to_string(),
        }
    }
}

thread_local! {
    static TIMING_STACK: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

lazy_static! {
    static ref TIMING_ENABLED: AtomicBool = AtomicBool::new(false);
    static ref FUNCTION_TIMINGS: Arc<RwLock<HashMap<String, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    static ref CATEGORY_TIMINGS: Arc<RwLock<HashMap<OperationCategory, Histogram<u64>>>> = Arc::new(RwLock::new(HashMap::new()));
    // total time, call count, distinct callers
    static ref HIERARCHICAL_TIMINGS: Arc<RwLock<HashMap<String, (Duration, usize, Vec<String>)>>> = Arc::new(RwLock::new(HashMap::new()));
}

/// Records the elapsed time of a scope when dropped.
pub struct TimingGuard {
    function_name: String,
    category: OperationCategory,
    start: Instant,
    active: bool,
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            record_timing_end(&self.function_name, self.start.elapsed(), &self.category);
        }
    }
}

pub fn start_timing(function_name: &str, category: OperationCategory) -> TimingGuard {
    let active = is_timing_enabled();
    if active {
        TIMING_STACK.with(|stack| stack.borrow_mut().push(function_name.to_string()));
    }

    TimingGuard {
        function_name: function_name.to_string(),
        category,
        start: Instant::now(),
        active,
    }
}

fn new_histogram() -> Option<Histogram<u64>> {
    Histogram::<u64>::new_with_bounds(1, HISTOGRAM_MAX_NS, HISTOGRAM_SIGFIG).ok()
}

fn record_into<K>(map: &RwLock<HashMap<K, Histogram<u64>>>, key: &K, value_ns: u64)
where
    K: std::hash::Hash + Eq + Clone,
{
    let mut timings = map.write();
    if !timings.contains_key(key) {
        match new_histogram() {
            Some(histogram) => {
                timings.insert(key.clone(), histogram);
            }
            None => return,
        }
    }
    if let Some(histogram) = timings.get_mut(key) {
        if let Err(err) = histogram.record(value_ns.max(1)) {
            warn!(value_ns, error = %err, "Dropped timing sample");
        }
    }
}

fn record_timing_end(function_name: &str, duration: Duration, category: &OperationCategory) {
    let duration_ns = duration.as_nanos().min(u128::from(HISTOGRAM_MAX_NS)) as u64;

    TIMING_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.pop();

        let mut hierarchical = HIERARCHICAL_TIMINGS.write();
        let entry = hierarchical
            .entry(function_name.to_string())
            .or_insert((Duration::from_nanos(0), 0, Vec::new()));
        entry.0 += duration;
        entry.1 += 1;

        if let Some(parent_name) = stack.last() {
            if !entry.2.contains(parent_name) {
                entry.2.push(parent_name.clone());
            }
        }
    });

    record_into(&FUNCTION_TIMINGS, &function_name.to_string(), duration_ns);
    record_into(&CATEGORY_TIMINGS, category, duration_ns);
}

/// Installs the global subscriber. `RUST_LOG` directives are honoured on top
/// of the `info` / `geoammonia=debug` defaults.
pub fn init_logging(enable_timing: bool) -> anyhow::Result<()> {
    TIMING_ENABLED.store(enable_timing, Ordering::SeqCst);

    let env_filter = EnvFilter::from_default_env()
        .add_directive(Level::INFO.into())
        .add_directive("geoammonia=debug".parse()?);

    let prototype = if enable_timing { new_histogram() } else { None };
    let timing_unavailable = enable_timing && prototype.is_none();

    if let Some(prototype) = prototype {
        let timing_layer = Builder::default().layer(move || prototype.clone());

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .with(timing_layer.boxed());

        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty());

        tracing::subscriber::set_global_default(subscriber)?;
    }

    if timing_unavailable {
        warn!("Could not create timing histograms, span timing layer disabled");
    }
    Ok(())
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::SeqCst)
}

/// Number of timed calls recorded for `function_name`.
pub fn recorded_calls(function_name: &str) -> usize {
    HIERARCHICAL_TIMINGS
        .read()
        .get(function_name)
        .map_or(0, |(_, count, _)| *count)
}

pub fn print_timing_report() {
    if !is_timing_enabled() {
        return;
    }

    println!("\nDetailed Performance Report");
    println!("==========================");

    println!("\nHierarchical Timing Analysis:");
    println!("---------------------------");
    let hierarchical = HIERARCHICAL_TIMINGS.read();
    let mut entries: Vec<_> = hierarchical.iter().collect();
    entries.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

    for (function_name, (total_duration, count, parents)) in entries {
        let avg_duration = total_duration.div_f64((*count).max(1) as f64);
        println!(
            "{}: total={:.2}s, count={}, avg={:.2}ms{}",
            function_name,
            total_duration.as_secs_f64(),
            count,
            avg_duration.as_secs_f64() * 1000.0,
            if !parents.is_empty() {
                format!("\n  Called by: {}", parents.join(", "))
            } else {
                String::new()
            }
        );
    }

    println!("\nPerformance by Category:");
    println!("------------------------");
    let category_timings = CATEGORY_TIMINGS.read();
    let mut category_vec: Vec<_> = category_timings.iter().collect();
    category_vec.sort_by(|a, b| {
        b.1.mean()
            .partial_cmp(&a.1.mean())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let total_time: f64 = category_vec
        .iter()
        .map(|(_, hist)| hist.mean() * (hist.len() as f64))
        .sum();

    for (category, histogram) in category_vec {
        let category_total = histogram.mean() * (histogram.len() as f64);
        let percentage = if total_time > 0.0 {
            category_total / total_time * 100.0
        } else {
            0.0
        };
        println!(
            "{}: {:.1}% of total time\n  mean={:.2}ms, p95={:.2}ms, p99={:.2}ms, count={}, total={:.2}s",
            category.as_str(),
            percentage,
            histogram.mean() / 1_000_000.0,
            histogram.value_at_quantile(0.95) as f64 / 1_000_000.0,
            histogram.value_at_quantile(0.99) as f64 / 1_000_000.0,
            histogram.len(),
            category_total / 1_000_000_000.0,
        );
    }

    println!("==========================\n");
}
