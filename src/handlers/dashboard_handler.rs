use crate::{app_state::AppState, errors::AppResult};

pub async fn dashboard(state: &AppState) -> AppResult<()> {
    state.require_user().await?;
    let view = state.dashboard_service.load().await?;
    println!("{}", view);
    Ok(())
}
