//! Account commands: signup, signin, signout, whoami

use super::{read_password, AppContext};
use crate::auth::{IdentityProvider, TaxDocument};
use crate::error::{FluxoError, FluxoResult};

/// Register an account and sign it in
pub fn handle_signup(
    ctx: &AppContext,
    email: &str,
    document: &str,
    password: Option<String>,
) -> FluxoResult<()> {
    let prompted = password.is_none();
    let secret = read_password(password, "Senha: ")?;

    if prompted {
        let confirm = read_password(None, "Confirme a senha: ")?;
        if secret.as_str() != confirm.as_str() {
            return Err(FluxoError::Validation("Passwords do not match".into()));
        }
    }

    ctx.paths.ensure_directories()?;
    let identity = ctx
        .identity_provider()
        .sign_up(email, &secret, document)?;

    println!("Conta criada: {}", identity.email);
    println!("Execute 'fluxo seed' para carregar dados de demonstração.");
    Ok(())
}

pub fn handle_signin(ctx: &AppContext, email: &str, password: Option<String>) -> FluxoResult<()> {
    let secret = read_password(password, "Senha: ")?;
    let identity = ctx.identity_provider().sign_in(email, &secret)?;
    println!("Sessão iniciada: {}", identity.email);
    Ok(())
}

pub fn handle_signout(ctx: &AppContext) -> FluxoResult<()> {
    let provider = ctx.identity_provider();
    match provider.current()? {
        Some(identity) => {
            provider.sign_out()?;
            println!("Sessão terminada: {}", identity.email);
        }
        None => println!("Nenhuma sessão ativa."),
    }
    Ok(())
}

pub fn handle_whoami(ctx: &AppContext) -> FluxoResult<()> {
    let provider = ctx.identity_provider();
    let Some(identity) = provider.current()? else {
        println!("Nenhuma sessão ativa.");
        return Ok(());
    };

    let profile = provider.profile(identity.user_id)?;
    println!("E-mail:    {}", identity.email);
    println!("Usuário:   {}", identity.user_id.as_uuid());
    match TaxDocument::parse(&profile.document) {
        Ok(doc) => println!("{:<10} {}", format!("{}:", doc.kind()), doc),
        Err(_) => println!("Documento: {}", profile.document),
    }
    Ok(())
}
