use fastGoldbach::prelude::*;

/// Bound searched when none is given.
pub const DEFAULT_BOUND: u32 = 10_000;

/// Search for the smallest odd numbers that are not a prime plus twice a
/// square, or not a prime plus two squares.
#[derive(Debug, Clone, Eq, PartialEq, clap::Parser)]
#[command(version, about)]
pub struct Args {
    /// Exclusive upper bound of the search.
    ///
    /// Rounded up to a multiple of the device's work-group size.
    #[arg(default_value_t = DEFAULT_BOUND, value_parser = clap::value_parser!(u32).range(1..))]
    pub bound: u32,

    /// Where to run the kernels.
    #[arg(long, value_enum, default_value_t = BackendArg::Cpu)]
    pub backend: BackendArg,

    /// Work-group size; defaults to the device's own.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub work_group_size: Option<u32>,

    /// Variant to check. Repeat to check several; defaults to both.
    #[arg(long = "variant", value_enum)]
    pub variants: Vec<VariantArg>,

    /// Print every prime found below the bound.
    #[arg(long, default_value_t = false)]
    pub print_primes: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum BackendArg {
    /// All CPU cores.
    Cpu,

    /// The last GPU adapter found.
    Gpu,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Cpu => CPU,
            BackendArg::Gpu => GPU,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum VariantArg {
    /// prime + 2·s²
    Original,

    /// prime + s1² + s2²
    Twosquare,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Original => Original,
            VariantArg::Twosquare => TwoSquare,
        }
    }
}

impl Args {
    /// Turn the command line into a validated search.
    pub fn search(&self) -> Result<GoldbachSearch, GoldbachError> {
        let mut builder = Goldbach::new()
            .bound(self.bound)
            .backend(self.backend.into());
        for &variant in &self.variants {
            builder = builder.variant(variant.into());
        }
        if let Some(size) = self.work_group_size {
            builder = builder.work_group_size(size);
        }
        if self.print_primes {
            builder = builder.return_primes();
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn defaults_search_both_variants_below_ten_thousand() {
        let args = Args::parse_from(["goldbach"]);
        assert_eq!(args.bound, DEFAULT_BOUND);
        assert_eq!(args.backend, BackendArg::Cpu);

        let search = args.search().unwrap();
        assert_eq!(search.config().variants, vec![Original, TwoSquare]);
        assert!(!search.config().return_primes);
    }

    #[test]
    fn repeated_variant_flags_keep_their_order() {
        let args = Args::parse_from([
            "goldbach", "500", "--variant", "twosquare", "--variant", "original",
        ]);
        let search = args.search().unwrap();
        assert_eq!(search.config().bound, 500);
        assert_eq!(search.config().variants, vec![TwoSquare, Original]);
    }

    #[test]
    fn duplicated_variant_is_a_usage_error() {
        let args = Args::parse_from([
            "goldbach", "--variant", "original", "--variant", "original",
        ]);
        let err = args.search().unwrap_err();
        assert!(err.is_usage_error());
    }

    #[test]
    fn zero_bound_is_rejected_by_the_parser() {
        let err = Args::try_parse_from(["goldbach", "0"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn gpu_backend_and_work_group_size_are_forwarded() {
        let args = Args::parse_from(["goldbach", "--backend", "gpu", "--work-group-size", "64"]);
        let search = args.search().unwrap();
        assert_eq!(search.backend(), GPU);
        assert_eq!(search.config().work_group_size, Some(64));
    }
}
