pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::ConfigProvider;
    use crate::extract::dialect::DialectSelectors;
    use crate::extract::policy::LegPolicy;
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_io_paths, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "order-etl")]
    #[command(about = "Extract train order confirmations into JSON records")]
    pub struct CliConfig {
        #[arg(long, short, help = "Order confirmation document (.html, .htm or .txt)")]
        pub input: String,

        #[arg(long, short, default_value = "result.json")]
        pub output: String,

        #[arg(long, help = "Indent the JSON output")]
        pub pretty: bool,

        #[arg(long, help = "Fail when the extracted record is incomplete")]
        pub strict: bool,

        #[arg(long, short, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn pretty_output(&self) -> bool {
            self.pretty
        }

        fn strict(&self) -> bool {
            self.strict
        }

        fn selectors(&self) -> DialectSelectors {
            DialectSelectors::default()
        }

        fn leg_policy(&self) -> LegPolicy {
            LegPolicy::default()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_io_paths(&self.input, &self.output)
        }
    }

}
