use clap::{Parser, Subcommand};
use pixel_kernels::thinning::{ReferenceThinning, TableThinning};
use pixel_kernels::tools::{
    LOADED_ORDER, count_mismatches, count_mismatches_above, count_nonzero, load_color, parse_sizes,
    random_binary, random_color, save_gray, seed_from_env, sizes_from_env,
};
use pixel_kernels::{
    Image, Size, luma_float, luma_optimized, luma_reference, resize_optimized, resize_reference,
    skeletonize_color_with, skeletonize_optimized, skeletonize_reference,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kerneltool", version, about = "Luma and thinning kernel tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a color image to BT.709 luma
    Luma {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Use the floating-point formula instead of the vectorized path
        #[arg(long)]
        float: bool,
    },
    /// Convert a color image to luma, threshold it and skeletonize it
    Skeletonize {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Values above this become foreground
        #[arg(long, default_value_t = 127)]
        threshold: u8,
        /// Use the inline-predicate reference path
        #[arg(long)]
        reference: bool,
    },
    /// Compare reference and optimized kernels on random images
    Verify {
        /// Comma-separated WxH list; defaults to KERNEL_SIZES or VGA/720p/1080p
        #[arg(long)]
        sizes: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kerneltool=info,pixel_kernels=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Luma {
            image,
            output,
            float,
        } => luma_cmd(&image, &output, float),
        Command::Skeletonize {
            image,
            output,
            threshold,
            reference,
        } => skeletonize_cmd(&image, &output, threshold, reference),
        Command::Verify { sizes, seed } => verify_cmd(sizes.as_deref(), seed),
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn luma_cmd(image: &Path, output: &Path, float: bool) -> bool {
    let color = match load_color(image) {
        Ok(img) => img,
        Err(err) => {
            tracing::error!(path = %image.display(), %err, "failed to load image");
            return false;
        }
    };

    let mut gray = Image::default();
    let start = Instant::now();
    let result = if float {
        luma_float(&color, &mut gray, LOADED_ORDER)
    } else {
        luma_optimized(&color, &mut gray, LOADED_ORDER)
    };
    if let Err(err) = result {
        tracing::error!(%err, "luma conversion failed");
        return false;
    }
    println!(
        "Luma {}x{} in {:.3} ms",
        gray.width(),
        gray.height(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    match save_gray(&gray, output) {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(path = %output.display(), %err, "failed to save image");
            false
        }
    }
}

fn skeletonize_cmd(image: &Path, output: &Path, level: u8, reference: bool) -> bool {
    let color = match load_color(image) {
        Ok(img) => img,
        Err(err) => {
            tracing::error!(path = %image.display(), %err, "failed to load image");
            return false;
        }
    };

    let start = Instant::now();
    let result = if reference {
        skeletonize_color_with(&color, LOADED_ORDER, level, &ReferenceThinning)
    } else {
        skeletonize_color_with(&color, LOADED_ORDER, level, &TableThinning::new())
    };
    let skeleton = match result {
        Ok(img) => img,
        Err(err) => {
            tracing::error!(%err, "thinning failed");
            return false;
        }
    };
    println!(
        "Skeleton {}x{}: {} foreground pixels in {:.3} ms",
        skeleton.width(),
        skeleton.height(),
        count_nonzero(&skeleton),
        start.elapsed().as_secs_f64() * 1000.0
    );

    match save_gray(&skeleton, output) {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(path = %output.display(), %err, "failed to save image");
            false
        }
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn report(name: &str, size: Size, gold: Duration, fast: Duration, mismatches: usize) {
    let factor = gold.as_secs_f64() / fast.as_secs_f64().max(f64::EPSILON);
    println!(
        "{:<10} {:>5}x{:<5} {:>10.3} ms {:>10.3} ms {:>6.2}x  mismatches={}",
        name,
        size.width,
        size.height,
        gold.as_secs_f64() * 1000.0,
        fast.as_secs_f64() * 1000.0,
        factor,
        mismatches
    );
}

fn verify_cmd(sizes: Option<&str>, seed: Option<u64>) -> bool {
    let sizes = match sizes {
        Some(list) => parse_sizes(list),
        None => sizes_from_env(),
    };
    let seed = seed.unwrap_or_else(seed_from_env);
    if sizes.is_empty() {
        tracing::error!("no valid sizes given");
        return false;
    }

    println!(
        "{:<10} {:>11} {:>13} {:>13} {:>7}",
        "kernel", "size", "reference", "optimized", "speedup"
    );
    let mut all_ok = true;

    for size in sizes {
        // Luma
        let color = random_color(size.width, size.height, seed);
        let mut gold = Image::default();
        let mut fast = Image::default();
        let (gold_result, gold_time) =
            timed(|| luma_reference(&color, &mut gold, LOADED_ORDER));
        let (fast_result, fast_time) =
            timed(|| luma_optimized(&color, &mut fast, LOADED_ORDER));
        if let Err(err) = gold_result.and(fast_result) {
            tracing::error!(%err, "luma failed");
            return false;
        }
        let mismatches = count_mismatches(&gold, &fast);
        all_ok &= mismatches == 0;
        report("luma", size, gold_time, fast_time, mismatches);

        // Resize to 1/1.7 x 1/1.4 of the source
        let gray = gold;
        let target = Size::new(
            ((size.width as f64 / 1.7) as usize).max(1),
            ((size.height as f64 / 1.4) as usize).max(1),
        );
        let mut gold = Image::new(target.width, target.height, gray.format());
        let mut fast = Image::new(target.width, target.height, gray.format());
        let (gold_result, gold_time) = timed(|| resize_reference(&gray, &mut gold, target));
        let (fast_result, fast_time) = timed(|| resize_optimized(&gray, &mut fast, target));
        if let Err(err) = gold_result.and(fast_result) {
            tracing::error!(%err, "resize failed");
            return false;
        }
        let mismatches = count_mismatches_above(&gold, &fast, 1);
        all_ok &= mismatches == 0;
        report("resize", size, gold_time, fast_time, mismatches);

        // Thinning
        let binary = random_binary(size.width, size.height, seed);
        let (gold, gold_time) = timed(|| skeletonize_reference(&binary));
        let (fast, fast_time) = timed(|| skeletonize_optimized(&binary));
        let (gold, fast) = match (gold, fast) {
            (Ok(gold), Ok(fast)) => (gold, fast),
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(%err, "thinning failed");
                return false;
            }
        };
        let mismatches = count_mismatches(&gold, &fast);
        all_ok &= mismatches == 0;
        report("thinning", size, gold_time, fast_time, mismatches);
    }

    if !all_ok {
        tracing::error!("optimized kernels diverged from reference");
    }
    all_ok
}
