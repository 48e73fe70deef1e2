//! Command execution.

use crate::{Commands, PowerAction};
use colored::Colorize;
use sdcp_client::{ClientError, Projector};
use sdcp_protocol::value::decode_u16;
use sdcp_protocol::{Item, Model, NO_DATA};
use serde::Serialize;

type CommandResult = Result<String, Box<dyn std::error::Error>>;

#[derive(Serialize)]
struct ItemOutput {
    name: &'static str,
    code: String,
    ir: bool,
}

#[derive(Serialize)]
struct ModelOutput {
    name: &'static str,
    power_command: bool,
}

#[derive(Serialize)]
struct SettingOutput {
    item: &'static str,
    code: String,
    data: Option<String>,
    value: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
}

impl SettingOutput {
    fn new(item: &Item, data: &[u8], model: Option<Model>) -> Self {
        let data = (data != [NO_DATA]).then_some(data);
        Self {
            item: item.name,
            code: hex::encode_upper(item.code),
            data: data.map(hex::encode_upper),
            value: data.and_then(decode_u16),
            name: data.and_then(|data| model.and_then(|model| model.name_for(item, data))),
        }
    }
}

/// Lists the item catalog.
pub fn list_items(json: bool) -> CommandResult {
    if json {
        let items: Vec<_> = Item::ALL
            .iter()
            .map(|item| ItemOutput {
                name: item.name,
                code: hex::encode_upper(item.code),
                ir: item.is_ir(),
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&items)?);
    }

    let mut output = String::new();
    for item in Item::ALL.iter() {
        let kind = if item.is_ir() { " (IR)" } else { "" };
        output.push_str(&format!(
            "  {}  {}{}\n",
            hex::encode_upper(item.code).cyan(),
            item.name,
            kind.dimmed()
        ));
    }
    Ok(output.trim_end().to_string())
}

/// Lists the model table.
pub fn list_models(json: bool) -> CommandResult {
    if json {
        let models: Vec<_> = Model::ALL
            .iter()
            .map(|model| ModelOutput {
                name: model.name,
                power_command: model.power_command,
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&models)?);
    }

    let mut output = String::new();
    for model in Model::ALL.iter() {
        let power = if model.power_command { "" } else { " (IR power)" };
        output.push_str(&format!("  {}{}\n", model.name.cyan(), power.dimmed()));
    }
    Ok(output.trim_end().to_string())
}

/// Executes a command against the projector and returns the formatted output.
pub async fn execute(projector: &Projector, cmd: Commands, json: bool) -> CommandResult {
    match cmd {
        Commands::Items => list_items(json),

        Commands::Models => list_models(json),

        Commands::Get { item } => {
            let item = parse_item(&item)?;
            let data = projector.get_setting(&item).await?;
            let output = SettingOutput::new(&item, &data, projector.model());
            if json {
                return Ok(serde_json::to_string_pretty(&output)?);
            }
            Ok(format_setting(&output))
        }

        Commands::Set { item, data } => {
            let item = parse_item(&item)?;
            let data = parse_data(projector, &item, &data)?;
            let reply = projector.set_setting(&item, &data).await?;
            let output = SettingOutput::new(&item, &reply, projector.model());
            if json {
                return Ok(serde_json::to_string_pretty(&output)?);
            }
            Ok(format!(
                "{} {} to {}",
                "Set".green(),
                item.name.cyan(),
                hex::encode_upper(&data)
            ))
        }

        Commands::Power { action } => match action {
            PowerAction::Status => {
                let status = projector.power_status().await?;
                if json {
                    return Ok(serde_json::to_string_pretty(&serde_json::json!({
                        "power": status,
                    }))?);
                }
                Ok(format!("Power: {}", status.to_string().yellow()))
            }
            PowerAction::On => {
                projector.power_on().await?;
                Ok(format!("{} on", "Powered".green()))
            }
            PowerAction::Off => {
                projector.power_off().await?;
                Ok(format!("{} off", "Powered".green()))
            }
        },

        Commands::Ir { item } => {
            let item = parse_item(&item)?;
            if !item.is_ir() {
                return Err(format!("{} is not an IR code", item.name).into());
            }
            projector.connector().send_ir(&item).await?;
            Ok(format!("{} {}", "Sent".green(), item.name.cyan()))
        }
    }
}

/// Parses an item name or a 4-digit hex code.
///
/// Codes outside the catalog are accepted so that any item can be addressed.
fn parse_item(arg: &str) -> Result<Item, String> {
    if let Some(item) = Item::from_name(arg) {
        return Ok(item);
    }

    let code = hex::decode(arg.trim_start_matches("0x"))
        .ok()
        .and_then(|bytes| <[u8; 2]>::try_from(bytes).ok())
        .ok_or_else(|| format!("unknown item {:?}", arg))?;

    Ok(Item::from_code(code).unwrap_or(Item::new(code, "Unlisted")))
}

/// Parses hex data, or the name of a value of `item` on the configured model.
fn parse_data(projector: &Projector, item: &Item, arg: &str) -> Result<Vec<u8>, ClientError> {
    if let Ok(data) = hex::decode(arg.trim()) {
        return Ok(data);
    }
    projector
        .model()
        .and_then(|model| model.code_for(item, arg))
        .map(|code| code.to_vec())
        .ok_or_else(|| ClientError::UnknownChoice {
            item: *item,
            name: arg.to_string(),
        })
}

fn format_setting(output: &SettingOutput) -> String {
    let header = format!("{} ({})", output.item.cyan(), output.code);
    match (&output.data, output.name, output.value) {
        (None, _, _) => format!("{}: {}", header, "no data".dimmed()),
        (Some(data), Some(name), _) => format!("{}: {} ({})", header, name.yellow(), data),
        (Some(data), None, Some(value)) => format!("{}: {} ({})", header, data, value),
        (Some(data), None, None) => format!("{}: {}", header, data),
    }
}
