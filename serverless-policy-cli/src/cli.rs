//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

/// Generate a least-privilege IAM policy for deploying a Serverless Framework service.
///
/// Values not given as flags, environment variables or in an answers file are
/// asked for interactively when stdin is a terminal.
#[derive(Parser, Debug, Default)]
#[command(name = "serverless-policy", version, about)]
pub struct Args {
    /// The name of the Serverless project
    #[arg(long, env = "SLS_POLICY_PROJECT")]
    pub project: Option<String>,

    /// The name of a single stage to target [default: *]
    #[arg(long, env = "SLS_POLICY_STAGE")]
    pub stage: Option<String>,

    /// The name of a single region to target [default: *]
    #[arg(long, env = "SLS_POLICY_REGION")]
    pub region: Option<String>,

    /// The id of a single KMS key to grant encrypt/decrypt access to
    #[arg(long, env = "SLS_POLICY_KMS_KEY")]
    pub kms_key: Option<String>,

    /// The AWS account id this role has access to [default: *]
    #[arg(long, env = "SLS_POLICY_AWS_ACCOUNT_ID")]
    pub aws_account_id: Option<String>,

    /// The service relies on DynamoDB
    #[arg(long)]
    pub dynamodb: bool,

    /// The service relies on Kinesis
    #[arg(long)]
    pub kinesis: bool,

    /// The service relies on API Gateway
    #[arg(long)]
    pub apigateway: bool,

    /// The service relies on SQS
    #[arg(long)]
    pub sqs: bool,

    /// The service uses S3 buckets
    #[arg(long)]
    pub s3: bool,

    /// The functions run inside a VPC
    #[arg(long)]
    pub vpc: bool,

    /// TOML file pre-answering the prompts
    #[arg(long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Substring of the deployment bucket name
    #[arg(long)]
    pub deployment_bucket_marker: Option<String>,

    /// Suffix of the generated function execution role name
    #[arg(long)]
    pub execution_role_suffix: Option<String>,

    /// Directory the policy file is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the policy to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Overwrite an existing policy file
    #[arg(long)]
    pub force: bool,

    /// Reject empty service names and control characters in any field
    #[arg(long)]
    pub strict: bool,

    /// Never prompt; use defaults for anything not provided
    #[arg(long)]
    pub no_input: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_feature_flags_parse() {
        let args = Args::try_parse_from([
            "serverless-policy",
            "--project",
            "svc",
            "--dynamodb",
            "--vpc",
            "-vv",
        ])
        .expect("should parse");
        assert_eq!(args.project.as_deref(), Some("svc"));
        assert!(args.dynamodb && args.vpc);
        assert!(!args.sqs);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.output_dir, PathBuf::from("."));
    }
}
