use log::info;
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::time;

use rbtree::RbTree;

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "inserts", default_value = "0")]
    inserts: usize,

    #[structopt(long = "deletes", default_value = "0")]
    deletes: usize,

    #[structopt(long = "finds", default_value = "0")]
    finds: usize,

    #[structopt(long = "verbose")]
    verbose: bool,
}

fn main() {
    let opts = Opt::from_args();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let seed = opts.seed.unwrap_or_else(random);
    info!("perf seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u64, u64> = RbTree::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.insert(key, val);
    }
    info!("loaded {} items in {:?}", opts.loads, start.elapsed());

    do_incremental(&mut rng, &opts, &mut index);

    let start = time::Instant::now();
    let n = index.iter().count();
    info!("iterating {} items, took {:?}", n, start.elapsed());

    let start = time::Instant::now();
    match index.validate() {
        Ok(()) => info!("validated {} items in {:?}", index.len(), start.elapsed()),
        Err(err) => panic!("{}", err),
    }
}

fn do_incremental(rng: &mut SmallRng, opts: &Opt, index: &mut RbTree<u64, u64>) {
    let total = opts.inserts + opts.deletes + opts.finds;
    if total == 0 {
        return;
    }

    let start = time::Instant::now();
    let (mut n_deleted, mut n_found) = (0, 0);
    for _i in 0..total {
        let op = rng.gen::<usize>() % total;
        let key = rng.gen::<u64>();

        if op < opts.inserts {
            index.insert(key, rng.gen());
        } else if op < (opts.inserts + opts.deletes) {
            // random u64 keys rarely hit, delete around the probe instead.
            let handle = index
                .find_lower_bound_node(&key)
                .or_else(|| index.last());
            if let Some(handle) = handle {
                index.delete(handle);
                n_deleted += 1;
            }
        } else if index.find(&key).is_ok() {
            n_found += 1;
        }
    }

    info!(
        "incremental for operations {}, deleted:{} found:{}, took {:?}",
        total,
        n_deleted,
        n_found,
        start.elapsed()
    );
}
