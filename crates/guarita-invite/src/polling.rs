//! Status refresh decisions and the post-refresh cooldown.
//!
//! The web page owns the button and the one-second ticker; this module owns
//! the rules: when a refresh may run, what a response means, and how long the
//! cooldown lasts.

use guarita_api::wire::CompletedInvite;

/// Seconds the refresh button stays disabled after a "no change" response.
pub const REFRESH_COOLDOWN_SECS: u32 = 20;

/// What one refresh attempt amounted to.
#[derive(Clone, Debug, PartialEq)]
pub enum RefreshOutcome {
    /// Access is already granted; nothing left to poll.
    AlreadyAuthorized,
    /// The server answered with the status we already hold. Soft failure:
    /// start the cooldown and nudge the guest towards the resident.
    Unchanged,
    /// The status moved; replace the held completed invite.
    Updated(CompletedInvite),
    /// Transport or parse failure. Same user-facing path as `Unchanged`,
    /// never a hard crash.
    Failed,
}

/// Whether the refresh button should fire at all.
pub fn should_refresh(current: &CompletedInvite, cooldown_remaining: u32, in_flight: bool) -> bool {
    !in_flight && cooldown_remaining == 0 && !current.status.is_authorized()
}

/// Interpret the recovery response against the held invite.
pub fn evaluate(current: &CompletedInvite, fetched: Option<CompletedInvite>) -> RefreshOutcome {
    if current.status.is_authorized() {
        return RefreshOutcome::AlreadyAuthorized;
    }
    match fetched {
        None => RefreshOutcome::Failed,
        Some(next) if next.status == current.status => RefreshOutcome::Unchanged,
        Some(next) => RefreshOutcome::Updated(next),
    }
}

/// Countdown driven by a one-second UI timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
}

impl Cooldown {
    pub fn start(&mut self) {
        self.remaining = REFRESH_COOLDOWN_SECS;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    /// One timer tick; returns true while still counting down.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }

    pub fn active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guarita_api::wire::InviteStatus;

    fn invite(status: InviteStatus) -> CompletedInvite {
        CompletedInvite {
            status,
            access: None,
            qr_token: None,
            qr_payload: None,
            companions: Vec::new(),
            visitor_phone: None,
            resident_phone: None,
        }
    }

    #[test]
    fn test_unchanged_status_is_a_soft_failure() {
        let current = invite(InviteStatus::AwaitingResident);
        let fetched = Some(invite(InviteStatus::AwaitingResident));
        assert_eq!(evaluate(&current, fetched), RefreshOutcome::Unchanged);
    }

    #[test]
    fn test_changed_status_replaces_the_invite() {
        let current = invite(InviteStatus::AwaitingResident);
        let fetched = invite(InviteStatus::Authorized);
        assert_eq!(
            evaluate(&current, Some(fetched.clone())),
            RefreshOutcome::Updated(fetched)
        );
    }

    #[test]
    fn test_authorized_state_short_circuits() {
        let current = invite(InviteStatus::Authorized);
        assert_eq!(
            evaluate(&current, Some(invite(InviteStatus::Entered))),
            RefreshOutcome::AlreadyAuthorized
        );
        assert!(!should_refresh(&current, 0, false));
    }

    #[test]
    fn test_transport_failure_is_never_a_crash() {
        let current = invite(InviteStatus::AwaitingResident);
        assert_eq!(evaluate(&current, None), RefreshOutcome::Failed);
    }

    #[test]
    fn test_refresh_blocked_while_in_flight_or_cooling_down() {
        let current = invite(InviteStatus::AwaitingResident);
        assert!(should_refresh(&current, 0, false));
        assert!(!should_refresh(&current, 12, false));
        assert!(!should_refresh(&current, 0, true));
    }

    #[test]
    fn test_cooldown_round_trip() {
        let mut cooldown = Cooldown::default();
        assert!(!cooldown.active());
        cooldown.start();
        assert_eq!(cooldown.remaining(), REFRESH_COOLDOWN_SECS);
        assert!(cooldown.active());
        for _ in 0..(REFRESH_COOLDOWN_SECS - 1) {
            assert!(cooldown.tick());
        }
        assert!(!cooldown.tick());
        assert!(!cooldown.active());

        // A status change resets the window immediately.
        cooldown.start();
        cooldown.clear();
        assert_eq!(cooldown.remaining(), 0);
    }
}
