use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use qrpayload::color::Color;
use qrpayload::output::{DEFAULT_BASENAME, DEFAULT_DIRECTORY};
use qrpayload::payload::{EncodingRequest, WifiSecurity};
use qrpayload::render::{ErrorCorrectionLevel, DEFAULT_BORDER};

#[derive(Parser, Debug)]
#[command(name = "qrpayload", version, about = "Build QR payloads and render them as SVG or PNG")]
pub struct Cli {
    #[arg(long, global = true, env = "QRPAYLOAD_BG", default_value = "#FFFFFF", help = "Background color (#RRGGBB, rgb(r,g,b) or a name)")]
    pub bg: Color,
    #[arg(long, global = true, env = "QRPAYLOAD_FG", default_value = "#000000", help = "Foreground (module) color")]
    pub fg: Color,
    #[arg(long, global = true, env = "QRPAYLOAD_ECC", default_value = "M", help = "Error correction level: L, M, Q or H")]
    pub ecc: ErrorCorrectionLevel,
    #[arg(long, global = true, default_value_t = DEFAULT_BORDER, help = "Quiet zone in modules, clamped to 0-10")]
    pub border: u8,
    #[arg(long, global = true, value_enum, default_value_t = Format::Svg)]
    pub format: Format,
    #[arg(long, global = true, default_value_t = 8, help = "Pixels per module for PNG output")]
    pub scale: u32,
    #[arg(long, global = true, env = "QRPAYLOAD_OUT_DIR", default_value = DEFAULT_DIRECTORY)]
    pub out_dir: PathBuf,
    #[arg(long, global = true, default_value = DEFAULT_BASENAME, help = "File name without extension")]
    pub name: String,
    #[arg(long, global = true, help = "Write SVG to stdout instead of a file")]
    pub stdout: bool,
    #[arg(long, global = true, help = "Print a terminal preview of the symbol")]
    pub preview: bool,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Svg,
    Png,
    /// Print only the encoded payload.
    Payload,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Free text, encoded verbatim.
    Text { body: String },
    /// Website link; `https://` is added when no scheme is given.
    Url { value: String },
    /// Email draft (`mailto:`) with optional subject and body.
    Email {
        address: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Phone number to dial (`tel:`).
    Phone { number: String },
    /// SMS to a number (`sms:`) with an optional message body.
    Sms {
        number: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// WiFi network credentials.
    Wifi {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "WPA", help = "WPA, WEP or nopass")]
        security: WifiSecurity,
        #[arg(long)]
        hidden: bool,
    },
    /// Read a JSON request from a file, or `-` for stdin.
    Json {
        #[arg(default_value = "-")]
        input: String,
    },
}

impl Command {
    pub fn into_request(self) -> anyhow::Result<EncodingRequest> {
        let request = match self {
            Command::Text { body } => EncodingRequest::Text { body },
            Command::Url { value } => EncodingRequest::Url { value },
            Command::Email {
                address,
                subject,
                body,
            } => EncodingRequest::Email {
                address,
                subject,
                body,
            },
            Command::Phone { number } => EncodingRequest::Phone { number },
            Command::Sms { number, body } => EncodingRequest::Sms { number, body },
            Command::Wifi {
                ssid,
                password,
                security,
                hidden,
            } => EncodingRequest::Wifi {
                ssid,
                password,
                security,
                hidden,
            },
            Command::Json { input } => {
                let raw = if input == "-" {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read request from stdin")?;
                    buf
                } else {
                    std::fs::read_to_string(&input)
                        .with_context(|| format!("failed to read request file {}", input))?
                };
                serde_json::from_str(&raw).context("malformed JSON request")?
            }
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wifi_with_globals() {
        let cli = Cli::try_parse_from([
            "qrpayload", "--ecc", "h", "--fg", "navy", "wifi", "Lab", "--password", "pw", "--security", "nopass",
            "--hidden",
        ])
        .unwrap();
        assert_eq!(cli.ecc, ErrorCorrectionLevel::H);
        assert_eq!(cli.fg, Color::rgb(0, 0, 0x80));
        let request = cli.command.into_request().unwrap();
        assert_eq!(
            request,
            EncodingRequest::Wifi {
                ssid: "Lab".into(),
                password: "pw".into(),
                security: WifiSecurity::None,
                hidden: true,
            }
        );
    }

    #[test]
    fn rejects_bad_color() {
        assert!(Cli::try_parse_from(["qrpayload", "--bg", "rgb(300,0,0)", "text", "x"]).is_err());
    }

    #[test]
    fn every_subcommand_has_help() {
        use clap::CommandFactory;
        let cmd = Cli::command();
        for sub in cmd.get_subcommands() {
            assert!(sub.get_about().is_some(), "`{}` has no help text", sub.get_name());
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
