use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::Config,
    domain::{
        dashboard::{self, status_label_key},
        i18n::{has_translation, translate_dynamic},
        quote_for_zone, refund_for_country, refund_quote, translate, AuthSession, ChatMessage,
        ChatRole, Dimensions, InvalidInput, Language, MessageKey, Package, PackageStatus,
        ParcelSpec, PriceQuote, RateTable, RateTableError, User, VatInput, VatRefundQuote,
    },
    infra::{
        gemini::guess_image_mime, restore_session, AuthClient, GeminiClient, ProfileUpdate,
        ServiceError, UserClient,
    },
    util::{
        format_kg, format_money,
        persistence::{PersistError, TokenStore},
        version::{version_label, APP_NAME},
    },
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Rates(#[from] RateTableError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("{0}")]
    Usage(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidInput(_) | AppError::Usage(_) => 2,
            AppError::Rates(_)
            | AppError::Read { .. }
            | AppError::Write { .. }
            | AppError::Json { .. } => 3,
            AppError::Service(_) => 4,
            AppError::Persist(_) => 5,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "babel", version, about = "Shipping and Off-Tax estimates for Roads of Babel")]
pub struct Cli {
    /// Language for labels (fr, en, it, es, pt, de, zh, ar, hi).
    #[arg(long, global = true, default_value = "fr")]
    pub lang: Language,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a parcel for a destination zone.
    Quote(QuoteArgs),
    /// Estimate the Off-Tax VAT refund on a purchase.
    Vat(VatArgs),
    /// List zones, VAT countries and warehouses.
    Zones,
    /// Estimate an item from a photo, then price it.
    Scan {
        image: PathBuf,
        #[arg(long, default_value = "world")]
        zone: String,
    },
    /// Ask the assistant a question.
    Chat {
        message: String,
        /// JSON file with the user's packages, used as context.
        #[arg(long)]
        packages: Option<PathBuf>,
        /// JSON transcript of the conversation so far; extended with this
        /// exchange. Created when missing.
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Summarise a package list.
    Dashboard {
        #[arg(long)]
        packages: PathBuf,
    },
    /// Create an account and sign in.
    Register(RegisterArgs),
    Login(CredentialArgs),
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List display languages and how much of the interface each covers.
    Languages,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Actual weight in kg.
    #[arg(long)]
    pub weight: f64,
    #[arg(long, default_value_t = 0.0)]
    pub length: f64,
    #[arg(long, default_value_t = 0.0)]
    pub width: f64,
    #[arg(long, default_value_t = 0.0)]
    pub height: f64,
    #[arg(long, default_value = "world")]
    pub zone: String,
    /// Origin warehouse (display only).
    #[arg(long, default_value = "fr")]
    pub origin: String,
}

#[derive(Debug, Args)]
pub struct VatArgs {
    /// VAT-inclusive purchase amount.
    #[arg(long)]
    pub amount: f64,
    #[arg(long, conflicts_with = "rate")]
    pub country: Option<String>,
    /// Explicit VAT rate, e.g. 0.2.
    #[arg(long)]
    pub rate: Option<f64>,
}

#[derive(Debug, Args)]
pub struct CredentialArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "BABEL_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
    /// Name recorded on the user profile.
    #[arg(long)]
    pub full_name: Option<String>,
}

/// One line of a saved chat transcript.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryEntry {
    role: ChatRole,
    text: String,
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env();
    let table = load_rate_table(&config)?;
    let lang = cli.lang;
    tracing::debug!("{APP_NAME} {} ({})", version_label(), lang.name());

    match cli.command {
        Command::Quote(args) => {
            let parcel = ParcelSpec::new(
                args.weight,
                Dimensions::new(args.length, args.width, args.height),
            )?;
            let quote = quote_for_zone(table, &args.zone, &parcel)?;
            if table.warehouse(&args.origin).is_none() {
                tracing::warn!("unknown origin warehouse `{}`", args.origin);
            }
            print_quote(lang, &args.origin, &args.zone, &parcel, &quote);
        }
        Command::Vat(args) => {
            let quote = match (args.country.as_deref(), args.rate) {
                (_, Some(rate)) => refund_quote(VatInput {
                    gross_amount: args.amount,
                    vat_rate: rate,
                })?,
                (Some(country), None) => refund_for_country(table, country, args.amount)?,
                (None, None) => refund_for_country(table, "fr", args.amount)?,
            };
            print_vat(lang, args.amount, &quote);
        }
        Command::Zones => print_tables(lang, table),
        Command::Scan { image, zone } => {
            let gemini = GeminiClient::new(&config)?;
            let bytes = read_file(&image)?;
            println!("{}", translate(lang, MessageKey::SimAiAnalyzing));
            let mime = guess_image_mime(&image.to_string_lossy());
            let Some(estimate) = gemini.analyze_item_image(&bytes, mime).await else {
                return Err(AppError::Usage(
                    "the item could not be estimated from this image".to_string(),
                ));
            };
            println!(
                "{}: {} x {} x {} cm, {}",
                estimate.category,
                estimate.length,
                estimate.width,
                estimate.height,
                format_kg(estimate.weight)
            );
            let parcel = ParcelSpec::try_from(&estimate)?;
            let quote = quote_for_zone(table, &zone, &parcel)?;
            print_quote(lang, "fr", &zone, &parcel, &quote);
        }
        Command::Chat {
            message,
            packages,
            history,
        } => {
            let gemini = GeminiClient::new(&config)?;
            let packages = match packages {
                Some(path) => load_packages(&path)?,
                None => Vec::new(),
            };
            let mut transcript = match &history {
                Some(path) => load_history(path)?,
                None => Vec::new(),
            };
            let reply = gemini.chat(&transcript, &message, &packages).await;
            println!("{reply}");
            if let Some(path) = history {
                transcript.push(ChatMessage::new(ChatRole::User, message));
                transcript.push(ChatMessage::new(ChatRole::Model, reply));
                save_history(&path, &transcript)?;
            }
        }
        Command::Dashboard { packages } => {
            let packages = load_packages(&packages)?;
            print_dashboard(lang, &packages);
        }
        Command::Register(args) => {
            let (auth, users) = account_clients(&config)?;
            let mut session = AuthSession::new(TokenStore::default_location());
            register(
                &mut session,
                &auth,
                &users,
                &args.credentials,
                args.full_name.as_deref(),
            )
            .await?;
            print_signed_in(&session);
        }
        Command::Login(creds) => {
            let (auth, users) = account_clients(&config)?;
            let mut session = AuthSession::new(TokenStore::default_location());
            sign_in(&mut session, &auth, &users, &creds).await?;
            print_signed_in(&session);
        }
        Command::Logout => {
            let mut session = AuthSession::new(TokenStore::default_location());
            session.logout()?;
            println!("Signed out");
        }
        Command::Whoami => {
            let session = restored_session(&config).await?;
            match session.user() {
                Some(user) => println!("{} <{}> ({})", user.display_name(), user.email, user.id),
                None => println!("Not signed in"),
            }
        }
        Command::Languages => print_languages(),
    }

    Ok(())
}

/// Operator file when configured, embedded table otherwise. Installed once.
pub fn load_rate_table(config: &Config) -> Result<&'static RateTable, RateTableError> {
    match &config.rates_file {
        Some(path) => {
            tracing::info!("loading rate table from {}", path.display());
            Ok(RateTable::from_path(path)?.install())
        }
        None => RateTable::active(),
    }
}

/// Logs in and persists the token. The profile merge is best effort.
pub async fn sign_in(
    session: &mut AuthSession,
    auth: &AuthClient,
    users: &UserClient,
    creds: &CredentialArgs,
) -> Result<(), AppError> {
    let (token, user) = fetch_token(auth, creds).await?;
    let profile = users.get_profile(&user.id, &token).await;
    let user = match profile {
        Ok(profile) => user.merge_profile(profile),
        Err(err) => {
            tracing::warn!("profile fetch failed, using auth data only: {err}");
            user
        }
    };
    session.login(token, user)?;
    Ok(())
}

/// Creates the account, logs in for a token, then records `full_name` on
/// the profile. A failed profile update still leaves the user signed in.
pub async fn register(
    session: &mut AuthSession,
    auth: &AuthClient,
    users: &UserClient,
    creds: &CredentialArgs,
    full_name: Option<&str>,
) -> Result<(), AppError> {
    let created = auth.register(&creds.email, &creds.password).await?;
    tracing::info!(user_id = %created.user.id, "account created");

    let (token, mut user) = fetch_token(auth, creds).await?;
    if let Some(name) = full_name.filter(|name| !name.trim().is_empty()) {
        let update = ProfileUpdate {
            full_name: Some(name.to_string()),
        };
        let updated = users.update_profile(&user.id, &update, &token).await;
        user = match updated {
            Ok(profile) => {
                let mut merged = user.merge_profile(profile);
                merged.full_name.get_or_insert_with(|| name.to_string());
                merged
            }
            Err(err) => {
                tracing::warn!("profile update failed: {err}");
                user
            }
        };
    }
    session.login(token, user)?;
    Ok(())
}

async fn fetch_token(
    auth: &AuthClient,
    creds: &CredentialArgs,
) -> Result<(String, User), AppError> {
    let response = auth.login(&creds.email, &creds.password).await?;
    let tokens = response
        .session
        .ok_or_else(|| AppError::Usage("login succeeded without a session".to_string()))?;
    Ok((tokens.access_token, User::from(response.user)))
}

fn account_clients(config: &Config) -> Result<(AuthClient, UserClient), AppError> {
    Ok((AuthClient::new(config)?, UserClient::new(config)?))
}

async fn restored_session(config: &Config) -> Result<AuthSession, AppError> {
    let (auth, users) = account_clients(config)?;
    let mut session = AuthSession::new(TokenStore::default_location());
    restore_session(&mut session, &auth, &users).await;
    Ok(session)
}

fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    fs::read(path).map_err(|source| AppError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = read_file(path)?;
    serde_json::from_slice(&raw).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn load_packages(path: &Path) -> Result<Vec<Package>, AppError> {
    read_json(path)
}

/// Saved transcript, oldest first. A missing file is an empty conversation.
pub fn load_history(path: &Path) -> Result<Vec<ChatMessage>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let entries: Vec<HistoryEntry> = read_json(path)?;
    Ok(entries
        .into_iter()
        .map(|entry| ChatMessage::new(entry.role, entry.text))
        .collect())
}

pub fn save_history(path: &Path, transcript: &[ChatMessage]) -> Result<(), AppError> {
    let entries: Vec<HistoryEntry> = transcript
        .iter()
        .map(|message| HistoryEntry {
            role: message.role,
            text: message.text.clone(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&entries).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| AppError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn print_signed_in(session: &AuthSession) {
    if let Some(user) = session.user() {
        println!("Signed in as {}", user.display_name());
    }
}

fn print_languages() {
    let total = MessageKey::ALL.len();
    for language in Language::ALL {
        let covered = MessageKey::ALL
            .iter()
            .filter(|key| has_translation(language, **key))
            .count();
        let direction = if language.is_rtl() { "rtl" } else { "ltr" };
        println!(
            "  {:<4} {:<12} {direction}  {covered}/{total}",
            language.code(),
            language.name()
        );
    }
}

fn print_quote(lang: Language, origin: &str, zone: &str, parcel: &ParcelSpec, quote: &PriceQuote) {
    let dims = parcel.dimensions();
    println!("{}", translate(lang, MessageKey::SimTitle));
    println!(
        "  {}: {}",
        translate(lang, MessageKey::SimOrigin),
        translate_dynamic(lang, &format!("wh_{origin}"))
    );
    println!(
        "  {}: {}",
        translate(lang, MessageKey::SimDest),
        translate_dynamic(lang, &format!("zone_{zone}"))
    );
    println!(
        "  {}: {} x {} x {}",
        translate(lang, MessageKey::SimDim),
        dims.length,
        dims.width,
        dims.height
    );
    println!(
        "  {}: {}",
        translate(lang, MessageKey::SimWeight),
        format_kg(parcel.weight_kg())
    );
    if quote.volumetric_applied {
        println!(
            "  {}: {}. {}",
            translate(lang, MessageKey::SimVolumetric),
            format_kg(quote.volumetric_weight),
            translate(lang, MessageKey::SimVolumetricDesc)
        );
    }
    println!(
        "  {}: {}",
        translate(lang, MessageKey::SimEstimate),
        format_money(quote.total_price)
    );
    println!("  {}", translate(lang, MessageKey::SimDisclaimer));
}

fn print_vat(lang: Language, amount: f64, quote: &VatRefundQuote) {
    println!("{}", translate(lang, MessageKey::VatCalcTitle));
    println!(
        "  {}: {}",
        translate(lang, MessageKey::VatLabelAmount),
        format_money(amount)
    );
    println!(
        "  {}: {}",
        translate(lang, MessageKey::VatResultGross),
        format_money(quote.vat_portion)
    );
    println!(
        "  {}: {}",
        translate(lang, MessageKey::VatResultFee),
        format_money(quote.handling_fee)
    );
    println!(
        "  {}: {}",
        translate(lang, MessageKey::VatResultNet),
        format_money(quote.net_refund)
    );
    println!("  {}", translate(lang, MessageKey::VatDisclaimer));
}

fn print_tables(lang: Language, table: &RateTable) {
    println!("{}", translate(lang, MessageKey::SimDest));
    for zone in table.zones() {
        println!(
            "  {:<14} {:<20} {} + {}/kg",
            zone.id,
            translate_dynamic(lang, &format!("zone_{}", zone.id)),
            format_money(zone.base_rate),
            format_money(zone.per_kg_rate)
        );
    }
    println!("{}", translate(lang, MessageKey::VatLabelCountry));
    for (country, rate) in table.vat_countries() {
        println!(
            "  {:<14} {:<20} {:.0}%",
            country,
            translate_dynamic(lang, &format!("wh_{country}")),
            rate * 100.0
        );
    }
    println!("{}", translate(lang, MessageKey::SimOrigin));
    for warehouse in table.warehouses() {
        println!(
            "  {} {:<20} {}",
            warehouse.flag,
            translate_dynamic(lang, &format!("wh_{}", warehouse.id)),
            warehouse.address
        );
    }
}

fn print_dashboard(lang: Language, packages: &[Package]) {
    let summary = dashboard::summarize(packages);
    println!(
        "{}: {}",
        translate(lang, MessageKey::DashTotalPackages),
        summary.total_packages
    );
    for status in PackageStatus::ALL {
        println!(
            "  {:<16} {}",
            translate(lang, status_label_key(status)),
            summary.count(status)
        );
    }
    println!(
        "{}: {}",
        translate(lang, MessageKey::DashInStockWeight),
        format_kg(summary.in_stock_weight)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quote_command() {
        let cli = Cli::try_parse_from([
            "babel", "--lang", "en", "quote", "--weight", "2", "--length", "30", "--width",
            "20", "--height", "15", "--zone", "europe",
        ])
        .unwrap();
        assert_eq!(cli.lang, Language::En);
        match cli.command {
            Command::Quote(args) => {
                assert_eq!(args.weight, 2.0);
                assert_eq!(args.zone, "europe");
                assert_eq!(args.origin, "fr");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn vat_country_and_rate_conflict() {
        let result = Cli::try_parse_from([
            "babel", "vat", "--amount", "100", "--country", "fr", "--rate", "0.2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["babel", "--lang", "xx", "zones"]).is_err());
    }

    #[test]
    fn parses_register_with_full_name() {
        let cli = Cli::try_parse_from([
            "babel", "register", "--email", "ada@example.com", "--password", "pw",
            "--full-name", "Ada Lovelace",
        ])
        .unwrap();
        match cli.command {
            Command::Register(args) => {
                assert_eq!(args.credentials.email, "ada@example.com");
                assert_eq!(args.full_name.as_deref(), Some("Ada Lovelace"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(matches!(
            Cli::try_parse_from(["babel", "languages"]).unwrap().command,
            Command::Languages
        ));
    }

    #[test]
    fn history_survives_a_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.json");
        assert!(load_history(&path).unwrap().is_empty());

        let transcript = vec![
            ChatMessage::new(ChatRole::User, "Where is my parcel?"),
            ChatMessage::new(ChatRole::Model, "In the Roissy warehouse."),
        ];
        save_history(&path, &transcript).unwrap();

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].role, ChatRole::User);
        assert_eq!(loaded[1].text, "In the Roissy warehouse.");

        fs::write(&path, "not json").unwrap();
        let err = load_history(&path).unwrap_err();
        assert!(matches!(err, AppError::Json { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_by_layer() {
        assert_eq!(
            AppError::from(InvalidInput::UnknownZone("moon".into())).exit_code(),
            2
        );
        assert_eq!(AppError::from(RateTableError::NoZones).exit_code(), 3);
        assert_eq!(
            AppError::from(ServiceError::MissingConfig("GEMINI_API_KEY")).exit_code(),
            4
        );
    }
}
