use std::sync::Arc;

use anyhow::{Context, bail};
use pki_core::PkiCore;
use pki_core::config::core_config::CoreConfig;
use pki_core::model::certificate::{Certificate, DATE_FORMAT};
use pki_core::provider::http_client::HttpClient;
use pki_core::provider::http_client::reqwest_client::ReqwestClient;
use pki_core::provider::identity::AccessTokenSource;
use pki_core::provider::identity::session::{Anonymous, AuthState, Session};
use pki_core::router::{Navigation, Router};
use pki_core::view::create_certificate::form::{CertificateForm, SubjectForm};
use pki_core::view::home::HomeView;
use shared_types::SerialNumber;
use time::OffsetDateTime;

use crate::cli::{AdminCaAssignCommand, CertificatesCommand, Cli, Command, CreateCertificateArgs};

pub async fn run(cli: Cli, config: &CoreConfig) -> anyhow::Result<()> {
    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::default());
    let session = sign_in(&cli, config, http_client.clone()).await?;

    let state: Arc<dyn AuthState> = match &session {
        Some(session) => session.clone(),
        None => Arc::new(Anonymous),
    };

    let route = cli.command.route();
    if let Navigation::Redirect(target) = Router::new(state).navigate(route.path()).await? {
        println!(
            "Not signed in, redirected to /{}. Pass --username and --password or --access-token.",
            target.path()
        );
        return Ok(());
    }
    let Some(session) = session else {
        bail!("No session for /{}", route.path());
    };

    let token_source: Arc<dyn AccessTokenSource> = session.clone();
    let core = PkiCore::new(config, http_client, token_source);

    match cli.command {
        Command::Home => {
            let view = HomeView::new(session);
            println!("{}", view.greeting());
            println!("Next: pki-console {}", view.create_certificate().path());
        }
        Command::Logout => {
            HomeView::new(session).logout().await?;
            println!("Signed out");
        }
        Command::Certificates(command) => certificates(&core, command).await?,
        Command::CreateCertificate(args) => create_certificate(&core, &session, args).await?,
        Command::AdminCaAssign(command) => admin_ca_assign(&core, &session, command).await?,
    }

    Ok(())
}

async fn sign_in(
    cli: &Cli,
    config: &CoreConfig,
    http_client: Arc<dyn HttpClient>,
) -> anyhow::Result<Option<Arc<Session>>> {
    if let Some(access_token) = &cli.access_token {
        let session = Session::from_access_token(access_token.to_owned().into())?;
        return Ok(Some(Arc::new(session)));
    }

    let (Some(username), Some(password)) = (&cli.username, &cli.password) else {
        tracing::debug!("No credentials given");
        return Ok(None);
    };

    let identity = PkiCore::identity_client(config, http_client);
    let session = Session::login(identity, username, &password.to_owned().into())
        .await
        .context("Sign in failed")?;

    Ok(Some(Arc::new(session)))
}

async fn certificates(core: &PkiCore, command: CertificatesCommand) -> anyhow::Result<()> {
    match command {
        CertificatesCommand::List => {
            let mut view = core.certificates_view();
            view.load().await;
            if let Some(error) = view.error {
                bail!(error);
            }
            print_certificates(&view.certificates);
        }
        CertificatesCommand::Revoke {
            serial_number,
            reason,
        } => {
            let mut view = core.certificates_view();
            view.revoke(&SerialNumber::from(serial_number.as_str()), reason)
                .await;
            if let Some(error) = view.error {
                bail!(error);
            }
            println!("Certificate {serial_number} revoked ({reason})");
        }
        CertificatesCommand::Reasons => {
            for reason in core.certificates_view().reasons() {
                println!("{:>2}  {reason}", reason.code());
            }
        }
        CertificatesCommand::Crl { issuer_dn, out } => {
            let crl = core.crl_service.download(&issuer_dn).await?;
            std::fs::write(&out, &crl)
                .with_context(|| format!("Failed writing {}", out.display()))?;
            println!("CRL ({} bytes) written to {}", crl.len(), out.display());
        }
    }

    Ok(())
}

async fn create_certificate(
    core: &PkiCore,
    session: &Session,
    args: CreateCertificateArgs,
) -> anyhow::Result<()> {
    let mut view = core.create_certificate_view();
    view.init(session.is_admin()).await;
    if let Some(error) = view.error.take() {
        tracing::warn!(%error, "Issuers could not be loaded");
    }

    fill_form(&mut view.form, &args)?;

    let today = OffsetDateTime::now_utc().date();
    let Some(certificate) = view.submit(today).await.cloned() else {
        bail!(view.error.unwrap_or_default());
    };

    print_certificates(std::slice::from_ref(&certificate));

    if let Some(out) = &args.out {
        match &certificate.pem {
            Some(pem) => {
                std::fs::write(out, pem)
                    .with_context(|| format!("Failed writing {}", out.display()))?;
                println!("PEM written to {}", out.display());
            }
            None => tracing::warn!("Response carries no PEM, nothing written"),
        }
    }

    Ok(())
}

/// Copies the command line values into the form
fn fill_form(form: &mut CertificateForm, args: &CreateCertificateArgs) -> anyhow::Result<()> {
    form.issuer_alias = args.issuer.clone().unwrap_or_default();
    form.subject = SubjectForm {
        common_name: args.common_name.clone().unwrap_or_default(),
        organization: args.organization.clone().unwrap_or_default(),
        organizational_unit: args.organizational_unit.clone().unwrap_or_default(),
        country: args.country.clone().unwrap_or_default(),
        state: args.state.clone().unwrap_or_default(),
        locality: args.locality.clone().unwrap_or_default(),
        email: args.email.clone().unwrap_or_default(),
    };

    for extension in &args.extensions {
        // a repeated extension replaces the earlier one, including the default
        let critical = form
            .extensions
            .iter()
            .position(|e| e.oid == extension.oid)
            .and_then(|index| form.remove_extension(index))
            .is_some_and(|replaced| replaced.is_critical);
        form.add_extension(extension.to_extension(critical));
    }

    for extension in form.extensions.iter_mut() {
        let critical = args.critical.iter().any(|name| {
            extension.oid == *name
                || extension
                    .name
                    .as_deref()
                    .is_some_and(|extension_name| extension_name.eq_ignore_ascii_case(name))
        });
        if critical {
            extension.is_critical = true;
        }
    }

    form.issued = args.issued;
    form.expires = args.expires;
    form.certificate_type = args.certificate_type;

    if let Some(csr) = &args.csr {
        form.load_csr_file(csr)
            .with_context(|| format!("Failed reading CSR {}", csr.display()))?;
    }

    Ok(())
}

async fn admin_ca_assign(
    core: &PkiCore,
    session: &Session,
    command: AdminCaAssignCommand,
) -> anyhow::Result<()> {
    let mut view = core.admin_ca_assign_view();
    view.load(session.is_admin()).await;

    if !view.is_admin {
        println!("The admin role is required for /admin-ca-assign");
        return Ok(());
    }
    if let Some(error) = view.error.take() {
        bail!(error);
    }

    match command {
        AdminCaAssignCommand::List => {
            println!("Unassigned certificates:");
            print_certificates(&view.certificates);
            println!();
            println!("CA users:");
            for user in &view.users {
                println!(
                    "{:<6} {:<32} {:>3} certificate(s)",
                    user.id.to_string(),
                    user.display_name(),
                    user.certificate_serial_numbers.len()
                );
            }
        }
        AdminCaAssignCommand::Assign {
            serial_number,
            user_id,
        } => {
            view.assign(Some(&serial_number), Some(&user_id)).await;

            match (view.confirmation, view.error) {
                (Some(confirmation), error) => {
                    println!("{confirmation}");
                    if let Some(error) = error {
                        tracing::warn!(%error, "Unassigned certificates could not be refreshed");
                    }
                }
                (None, Some(error)) => bail!(error),
                (None, None) => bail!("`{user_id}` is not a known CA user"),
            }
        }
    }

    Ok(())
}

fn print_certificates(certificates: &[Certificate]) {
    if certificates.is_empty() {
        println!("No certificates");
        return;
    }

    println!(
        "{:<40} {:<12} {:<32} {:<32} {:<10}",
        "SERIAL", "TYPE", "SUBJECT", "ISSUER", "EXPIRES"
    );
    for certificate in certificates {
        println!(
            "{:<40} {:<12} {:<32} {:<32} {:<10}",
            certificate.serial_number.as_str(),
            certificate
                .certificate_type
                .map(|certificate_type| certificate_type.to_string())
                .unwrap_or_default(),
            certificate.issuer_label(),
            certificate.issuer_cn.as_deref().unwrap_or_default(),
            certificate
                .expires
                .and_then(|expires| expires.date().format(DATE_FORMAT).ok())
                .unwrap_or_default(),
        );
    }
}
