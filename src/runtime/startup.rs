use crate::app::App;
use crate::net::NetWorker;

/// Kick off the initial library fetch.
///
/// The app starts on the Add Music view, but the player bar and the MPRIS
/// transport can act on the library before the user ever opens that view;
/// prefetching gives them a snapshot to work with. Entering the Library
/// view still refetches.
pub fn request_initial_data(app: &mut App, net: &NetWorker) {
    if let Some(cmd) = app.request_library_reload() {
        net.send(cmd);
    }
}
