use crate::engine::Engine;
use crate::models::PairingMethod;
use crate::roster::Roster;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub roster: Roster,
    /// Method used when a pairing request does not name one
    pub default_pairing_method: PairingMethod,
}
