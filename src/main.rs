use azure_nsg_manager::azure::{self, ArmNetworkClient};
use azure_nsg_manager::config::{
    Config, TransportKind, RESOURCE_GROUP_ENV, SUBSCRIPTION_ENV, TRANSPORT_ENV,
};
use azure_nsg_manager::models::NetworkSecurityGroupConfig;
use azure_nsg_manager::{Nsg, NsgManager};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashSet;
use std::error::Error;

/// Manage the network security groups of a fuzzing resource group.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Resource group (default: $ONEFUZZ_RESOURCE_GROUP)
    #[arg(long, short = 'g')]
    resource_group: Option<String>,
    /// Subscription id (default: $AZURE_SUBSCRIPTION_ID, then the az login)
    #[arg(long)]
    subscription: Option<String>,
    /// How to reach Azure (default: $NSG_TRANSPORT, then cli)
    #[arg(long, value_enum)]
    transport: Option<TransportKind>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every NSG in the resource group
    List,
    /// Show one NSG
    Show { name: String },
    /// Create an NSG unless it exists
    Create {
        name: String,
        /// Region, defaults to the name
        #[arg(long)]
        region: Option<String>,
    },
    /// Start deleting an NSG
    Delete { name: String },
    /// Show the custom rules of an NSG
    Rules { name: String },
    /// Replace the inbound allow-list of an NSG
    SetAllowed {
        name: String,
        #[arg(long = "ip")]
        ips: Vec<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Remove every custom rule from an NSG
    ClearRules { name: String },
    AssociateNic { name: String, nic: String },
    DissociateNic { name: String, nic: String },
    AssociateSubnet {
        name: String,
        vnet: String,
        subnet: String,
    },
    DissociateSubnet {
        name: String,
        vnet: String,
        subnet: String,
    },
    /// Delete platform NSGs in regions that are not active
    Reap {
        #[arg(long = "active-region")]
        active_regions: Vec<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::from_env(|key| match key {
        RESOURCE_GROUP_ENV => cli.resource_group.clone(),
        SUBSCRIPTION_ENV => cli.subscription.clone(),
        TRANSPORT_ENV => cli.transport.map(|t| t.to_string()),
        _ => None,
    })?;

    let client = azure::connect(&config).await?;
    log::debug!("subscription: {}", client.subscription_id());
    let manager = NsgManager::from_config(client, &config);
    let rg = manager.resource_group().to_string();
    let arm: &ArmNetworkClient = manager.client();

    match cli.command {
        Command::List => print_json(&manager.list_nsgs().await?)?,
        Command::Show { name } => match manager.get_nsg(&name).await {
            Some(nsg) => print_json(&nsg)?,
            None => return Err(format!("nsg {name} not found").into()),
        },
        Command::Create { name, region } => {
            let region = region.unwrap_or_else(|| name.clone());
            let nsg = Nsg::new(&name, &region)?;
            nsg.create(&manager).await?;
            log::info!("nsg {} present in {}", nsg.name(), nsg.region());
        }
        Command::Delete { name } => {
            let started = manager.start_delete_nsg(&name).await;
            print_json(&serde_json::json!({ "name": name, "delete_started": started }))?;
        }
        Command::Rules { name } => print_json(&manager.get_all_rules(&name).await?)?,
        Command::SetAllowed { name, ips, tags } => {
            let sources = NetworkSecurityGroupConfig::new(ips, tags);
            manager.set_allowed(&name, &sources).await?;
        }
        Command::ClearRules { name } => manager.clear_all_rules(&name).await?,
        Command::AssociateNic { name, nic } => {
            let mut nic = arm.get_nic(&rg, &nic).await?;
            manager.associate_nic(&name, &mut nic).await?;
            print_json(&nic)?;
        }
        Command::DissociateNic { name, nic } => {
            let mut nic = arm.get_nic(&rg, &nic).await?;
            manager.dissociate_nic(&name, &mut nic).await?;
            print_json(&nic)?;
        }
        Command::AssociateSubnet { name, vnet, subnet } => {
            let vnet = arm.get_vnet(&rg, &vnet).await?;
            let mut subnet = arm.get_subnet(&rg, &vnet.name, &subnet).await?;
            manager.associate_subnet(&name, &vnet, &mut subnet).await?;
            print_json(&subnet)?;
        }
        Command::DissociateSubnet { name, vnet, subnet } => {
            let vnet = arm.get_vnet(&rg, &vnet).await?;
            let mut subnet = arm.get_subnet(&rg, &vnet.name, &subnet).await?;
            manager.dissociate_subnet(&name, &vnet, &mut subnet).await?;
            print_json(&subnet)?;
        }
        Command::Reap { active_regions } => {
            let active: HashSet<String> = active_regions.into_iter().collect();
            print_json(&manager.reap(&active).await?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = log4rs::init_file("log4rs.yml", Default::default()) {
        eprintln!("log4rs.yml not loaded, logging disabled: {e}");
    }
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        match err.downcast_ref::<azure_nsg_manager::Error>() {
            Some(nsg_err) => match serde_json::to_string(nsg_err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{nsg_err}"),
            },
            None => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
}
