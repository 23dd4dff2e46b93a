use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::io::Write;

use crate::config::AppState;
use crate::domain::{AssignmentForm, DateRange, Stage, StageView, UpdateDriverRequest};
use crate::error::{AppError, AppResult};
use crate::handlers::driver::{CheckOutSelection, DriverWorkbench};
use crate::handlers::stage::StagePage;
use crate::handlers::{auth, reference, reports};
use crate::render;
use crate::repositories::HttpShipmentApi;
use crate::session::{self, SessionContext};

#[derive(Parser)]
#[command(name = "sts-dashboard")]
#[command(about = "Dashboard serah terima Surat Jalan (SJ): Delivery -> DPK -> Driver -> Customer -> FAT")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Filter tanggal `movement_date`, default bulan berjalan
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Tanggal awal (yyyy-MM-dd)
    #[arg(long)]
    pub from: Option<String>,
    /// Tanggal akhir (yyyy-MM-dd)
    #[arg(long)]
    pub to: Option<String>,
}

impl RangeArgs {
    pub fn resolve(&self) -> AppResult<DateRange> {
        let today = Local::now().date_naive();
        Ok(DateRange::parse(self.from.as_deref(), self.to.as_deref(), today)?)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Login dan simpan token
    Login {
        #[arg(short, long)]
        username: String,
        /// Kalau kosong, password ditanyakan lewat stdin
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Hapus token lokal
    Logout,
    /// Tampilkan user yang sedang login
    Whoami,
    /// Tampilkan list SJ satu halaman workflow
    List {
        #[arg(value_enum)]
        stage: Stage,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Serah terima / terima SJ terpilih ke status berikutnya
    Handover {
        #[arg(value_enum)]
        stage: Stage,
        /// ID dokumen (m_inout_id), pisahkan dengan koma
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
        /// Pilih semua dokumen di list
        #[arg(long)]
        all: bool,
        /// Pilih semua anggota SPP group ("-" untuk group tanpa SPP)
        #[arg(long)]
        spp: Vec<String>,
        /// Toggle SPP group: kalau semua anggota sudah terpilih maka dilepas
        #[arg(long)]
        toggle_spp: Vec<String>,
        /// Driver (wajib untuk serah ke driver)
        #[arg(long)]
        driver: Option<i64>,
        /// TNKB (wajib untuk serah ke driver)
        #[arg(long)]
        tnkb: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
        /// Lewati konfirmasi
        #[arg(short = 'y', long)]
        yes: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Batalkan satu SJ di halaman outstanding / marketing receipt
    Cancel {
        #[arg(value_enum)]
        stage: Stage,
        id: i64,
        #[arg(short = 'y', long)]
        yes: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Tampilkan SJ Marketing -> FAT per SPP
    Groups {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Progress milestone per SJ
    Progress {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// History SJ beserta bundle
    History {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Reference list
    Reference {
        #[command(subcommand)]
        kind: ReferenceKind,
    },
    /// Menu driver
    Driver {
        #[command(subcommand)]
        command: DriverCommand,
    },
    /// Ganti driver/TNKB SJ yang sudah diserahkan ke driver
    Reassign {
        id: i64,
        #[arg(long)]
        driver: i64,
        #[arg(long)]
        tnkb: i64,
        #[arg(short = 'y', long)]
        yes: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Update nama dan password driver (Admin)
    UpdateDriver {
        driver_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
pub enum ReferenceKind {
    Drivers,
    Tnkbs,
    Customers,
}

#[derive(Subcommand)]
pub enum DriverCommand {
    /// SJ yang sedang dibawa, dikelompokkan per customer
    InTransit,
    /// SJ yang sudah check-in di customer
    OnCustomer {
        #[arg(long)]
        customer: Option<i64>,
    },
    /// Check-in semua SJ untuk satu customer
    CheckIn {
        customer: i64,
        #[arg(long)]
        notes: Option<String>,
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Check-out dari customer
    CheckOut {
        customer: i64,
        /// Hanya SJ ini yang di-check-out (default: semua)
        #[arg(long, value_delimiter = ',', conflicts_with = "activity_only")]
        ids: Vec<i64>,
        /// Check-out tanpa SJ, dokumen ditunda di customer
        #[arg(long)]
        activity_only: bool,
        #[arg(long)]
        notes: Option<String>,
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Jalankan command. 401 dari command yang memakai token tersimpan menghapus
/// token lokal, login yang gagal tidak menyentuhnya.
pub async fn run(cli: Cli, state: &AppState) -> AppResult {
    match cli.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            let user = auth::login(state, username, password).await?;
            println!("✅ Login sebagai {} ({})", user.username, user.role().as_str());
        }
        Commands::Logout => {
            if auth::logout(state)? {
                println!("👋 Logout berhasil");
            } else {
                println!("Belum login");
            }
        }
        Commands::Whoami => {
            let user = auth::whoami(state).await?;
            println!("{} (id {}, role {})", user.username, user.user_id, user.role().as_str());
            println!("Backend: {}", state.config.api_url);
        }
        other => {
            // initialize sendiri sudah menghapus token kalau /me balas 401
            let session = SessionContext::initialize(&state.client, &state.store).await?;
            let api = HttpShipmentApi::new(state.client.clone(), session.token());
            if let Err(err) = run_authenticated(other, &api, &session).await {
                if err.is_unauthorized() {
                    tracing::warn!("🔒 Token ditolak backend, session dihapus");
                    session::invalidate(&state.store);
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

async fn run_authenticated(
    command: Commands,
    api: &HttpShipmentApi,
    session: &SessionContext,
) -> AppResult {
    match command {
        Commands::List { stage, range } => {
            let mut page = StagePage::new(api, session, stage, range.resolve()?);
            page.refresh().await?;
            println!("{} ({} s/d {})", page.stage().title(), page.range().from, page.range().to);
            match stage.view() {
                StageView::GroupedBySpp => print!("{}", render::format_spp_groups(&page.groups())),
                StageView::Flat => print!("{}", render::format_documents(page.documents(), None)),
            }
        }
        Commands::Handover {
            stage,
            ids,
            all,
            spp,
            toggle_spp,
            driver,
            tnkb,
            notes,
            yes,
            range,
        } => {
            let mut page = StagePage::new(api, session, stage, range.resolve()?);
            page.refresh().await?;

            if all {
                page.select_all();
            }
            page.select_ids(&ids)?;
            for key in &spp {
                page.select_group(spp_key(key))?;
            }
            for key in &toggle_spp {
                page.toggle_group(spp_key(key))?;
            }
            page.assignment_mut().set_driver(driver);
            page.assignment_mut().set_tnkb(tnkb);

            let plan = page.prepare(notes.as_deref())?;
            print!("{}", render::format_documents(page.documents(), Some(page.selection())));
            println!("{}: {}", plan.summary(), plan.document_nos.join(", "));
            if !confirm("Lanjutkan?", yes)? {
                println!("❌ Dibatalkan");
                return Ok(());
            }

            let outcome = page.submit(plan).await?;
            println!(
                "✅ {} ({} SJ dikirim, {} SJ tersisa di halaman)",
                outcome.message, outcome.submitted, outcome.remaining
            );
        }
        Commands::Cancel {
            stage,
            id,
            yes,
            range,
        } => {
            let mut page = StagePage::new(api, session, stage, range.resolve()?);
            page.refresh().await?;
            if !confirm(&format!("Batalkan SJ {}?", id), yes)? {
                println!("❌ Dibatalkan");
                return Ok(());
            }
            println!("✅ {}", page.cancel(id).await?);
        }
        Commands::Groups { range } => {
            let mut page = StagePage::new(api, session, Stage::MarketingToFat, range.resolve()?);
            page.refresh().await?;
            print!("{}", render::format_spp_groups(&page.groups()));
        }
        Commands::Progress { range } => {
            let rows = reports::progress(api, range.resolve()?).await?;
            print!("{}", render::format_progress(&rows));
        }
        Commands::History { range } => {
            let docs = reports::history(api, range.resolve()?).await?;
            print!("{}", render::format_history(&docs));
        }
        Commands::Reference { kind } => match kind {
            ReferenceKind::Drivers => print!("{}", render::format_drivers(&reference::drivers(api).await?)),
            ReferenceKind::Tnkbs => print!("{}", render::format_tnkbs(&reference::tnkbs(api).await?)),
            ReferenceKind::Customers => {
                print!("{}", render::format_customers(&reference::customers(api).await?))
            }
        },
        Commands::Driver { command } => run_driver(command, api, session).await?,
        Commands::Reassign {
            id,
            driver,
            tnkb,
            yes,
            range,
        } => {
            let mut page = StagePage::new(api, session, Stage::OutstandingDpk, range.resolve()?);
            page.refresh().await?;
            let form = AssignmentForm::new(Some(driver), Some(tnkb));
            if !confirm(&format!("Ganti driver/TNKB SJ {}?", id), yes)? {
                println!("❌ Dibatalkan");
                return Ok(());
            }
            println!("✅ {}", page.reassign(id, &form).await?);
        }
        Commands::UpdateDriver {
            driver_id,
            name,
            password,
        } => {
            let request = UpdateDriverRequest {
                driver_id,
                driver_name: name,
                password,
            };
            println!("✅ {}", reference::update_driver(api, session, request).await?);
        }
        Commands::Login { .. } | Commands::Logout | Commands::Whoami => {}
    }
    Ok(())
}

async fn run_driver(
    command: DriverCommand,
    api: &HttpShipmentApi,
    session: &SessionContext,
) -> AppResult {
    if !session.user().is_driver() {
        return Err(AppError::forbidden("Menu driver khusus user dengan role driver"));
    }
    let bench = DriverWorkbench::new(api, session);

    match command {
        DriverCommand::InTransit => {
            print!("{}", render::format_customer_groups(&bench.customer_groups().await?));
        }
        DriverCommand::OnCustomer { customer } => {
            if let Some(active) = bench.active_check_in().await? {
                println!("📍 Sedang check-in di {}", active.customer_label());
            }
            print!("{}", render::format_documents(&bench.on_customer(customer).await?, None));
        }
        DriverCommand::CheckIn {
            customer,
            notes,
            yes,
        } => {
            if !confirm(&format!("Check-in di customer {}?", customer), yes)? {
                println!("❌ Dibatalkan");
                return Ok(());
            }
            let outcome = bench.check_in(customer, notes.as_deref()).await?;
            println!(
                "✅ {} ({} SJ check-in, {} SJ masih in-transit)",
                outcome.message, outcome.submitted, outcome.remaining
            );
        }
        DriverCommand::CheckOut {
            customer,
            ids,
            activity_only,
            notes,
            yes,
        } => {
            let selection = if activity_only {
                CheckOutSelection::None
            } else if ids.is_empty() {
                CheckOutSelection::All
            } else {
                CheckOutSelection::Only(ids)
            };
            if !confirm(&format!("Check-out dari customer {}?", customer), yes)? {
                println!("❌ Dibatalkan");
                return Ok(());
            }
            let outcome = bench.check_out(customer, selection, notes.as_deref()).await?;
            println!(
                "✅ {} ({} SJ check-out, {} SJ masih di customer)",
                outcome.message, outcome.submitted, outcome.remaining
            );
        }
    }
    Ok(())
}

// "-" berarti group tanpa SPP
fn spp_key(raw: &str) -> Option<&str> {
    if raw == "-" {
        None
    } else {
        Some(raw)
    }
}

fn prompt(label: &str) -> AppResult<String> {
    print!("{}", label);
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::internal(e.to_string()))?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(input.trim().to_string())
}

// Konfirmasi y/N sebelum request mutasi dikirim
fn confirm(question: &str, auto_approve: bool) -> AppResult<bool> {
    if auto_approve {
        return Ok(true);
    }
    let answer = prompt(&format!("{} [y/N]: ", question))?.to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
