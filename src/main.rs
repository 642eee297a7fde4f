use clap::Parser;
use tracing::{debug, error};

mod aws;
mod ec2;
mod error;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "ec2tag",
    version,
    about = "Print the value of a tag on an EC2 instance, looked up by instance ID"
)]
struct Cli {
    /// Instance ID to look up; on an instance, pass the value of
    /// http://169.254.169.254/latest/meta-data/instance-id
    #[arg(short = 'i', long = "instance-id")]
    instance_id: Option<String>,

    /// Tag key to resolve
    #[arg(short = 't', long = "tagkey", default_value = "Name")]
    tagkey: String,

    /// Shared credentials profile; when unset, role credentials come from
    /// the instance metadata service
    #[arg(short = 'p', long = "profile")]
    profile: Option<String>,

    /// Region for the lookup; when unset in instance identity mode it is
    /// resolved from the instance metadata service
    #[arg(short = 'r', long = "region")]
    region: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(err) = run(cli).await {
        error!(error = format!("{err:#}"), "tag lookup failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Without an instance ID there is nothing to look up; exit without
    // touching the network, successfully and silently.
    let Some(instance_id) = cli.instance_id.filter(|id| !id.is_empty()) else {
        debug!("no instance ID supplied, nothing to do");
        return Ok(());
    };

    let profile = cli.profile.as_deref().filter(|p| !p.is_empty());
    let region = cli.region.filter(|r| !r.is_empty());

    let config = aws::load_sdk_config(profile, region).await?;
    let client = aws_sdk_ec2::Client::new(&config);

    let value = ec2::tag_value_for_instance(&client, &instance_id, &cli.tagkey).await?;
    println!("{value}");
    Ok(())
}
