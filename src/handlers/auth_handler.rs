use crate::{
    app_state::AppState,
    errors::AppResult,
    models::dto::request::{LoginForm, ProfileUpdate, RegisterForm},
};

pub async fn login(state: &AppState, email: String, password: String) -> AppResult<()> {
    let form = LoginForm { email, password };
    let user = state.auth_service.login(&form).await?;
    println!("Logged in as {} ({})", user.name, user.username);
    Ok(())
}

pub async fn register(state: &AppState, form: RegisterForm) -> AppResult<()> {
    let user = state.auth_service.register(&form).await?;
    println!(
        "Account {} created. Log in with: quizwhiz login --email {}",
        user.username, user.email
    );
    Ok(())
}

pub fn logout(state: &AppState) -> AppResult<()> {
    state.auth_service.logout()?;
    println!("Logged out");
    Ok(())
}

pub async fn profile(state: &AppState, update: ProfileUpdate) -> AppResult<()> {
    state.require_user().await?;
    let user = if update == ProfileUpdate::default() {
        state.auth_service.profile().await?
    } else {
        state.auth_service.update_profile(&update).await?
    };
    println!("Name:     {}", user.name);
    println!("Username: {}", user.username);
    println!("Email:    {}", user.email);
    Ok(())
}
