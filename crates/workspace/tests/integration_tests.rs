//! Integration tests for the Terminon workspace.
//!
//! These drive a [`Workspace`] end to end over a recording process host and
//! recording surfaces, so no real processes are spawned.
//!
//! # Test Organization
//!
//! - `tab_lifecycle` - Opening, closing and session exit
//! - `session_routing` - Output, input and geometry routing per session
//! - `configuration` - Theme broadcast and profile persistence

mod common;

use common::{data, exit, workspace, HostCall, TestEnv};
use terminal::{SessionId, SurfaceArea, TermSize};
use terminon_workspace::{ActiveView, PanelKey, TabKind, WorkspaceSignal};

// ============================================================================
// Tab Lifecycle Tests
// ============================================================================

mod tab_lifecycle {
    use super::*;
    use pretty_assertions::assert_eq;
    use actions::Action;
    use proptest::prelude::*;
    use settings::Invocation;

    #[test]
    fn startup_opens_one_terminal_session() {
        let (mut ws, logs) = workspace();
        let id = ws.open_startup(None);

        assert_eq!(ws.tabs().len(), 1);
        assert_eq!(ws.tabs().active_id(), Some(&id));
        assert_eq!(
            ws.host().calls,
            vec![HostCall::Create(id.clone(), Invocation::default())]
        );
        assert_eq!(logs.borrow().len(), 1);
        assert!(matches!(ws.active_view(), ActiveView::Terminal(_)));
    }

    #[test]
    fn unknown_startup_profile_falls_back_to_default_shell() {
        let (mut ws, _) = workspace();
        let id = ws.open_startup(Some("no-such-profile"));
        assert_eq!(
            ws.tabs().get(&id).and_then(|tab| tab.invocation.clone()),
            Some(Invocation::default())
        );
    }

    #[test]
    fn closing_last_tab_shows_welcome() {
        let (mut ws, logs) = workspace();
        let id = ws.open_startup(None);

        assert!(ws.close_tab(&id));
        assert!(ws.tabs().is_empty());
        assert_eq!(ws.host().closed(), vec![id]);
        assert!(logs.borrow()[0].disposed);
        assert!(matches!(ws.active_view(), ActiveView::Welcome { cursor: 0 }));
    }

    #[test]
    fn only_tab_exit_ends_the_window() {
        let (mut ws, _) = workspace();
        let id = ws.open_startup(None);

        assert_eq!(ws.handle_host_event(exit(&id)), WorkspaceSignal::Exit);
        assert_eq!(ws.host().closed(), vec![id.clone()]);
        assert!(ws.bridge(&id).is_none());
    }

    #[test]
    fn sibling_exit_closes_only_that_tab() {
        let (mut ws, _) = workspace();
        let first = ws.open_terminal(None);
        let second = ws.open_terminal(None);

        assert_eq!(ws.handle_host_event(exit(&second)), WorkspaceSignal::Continue);
        assert_eq!(ws.tabs().len(), 1);
        assert_eq!(ws.tabs().active_id(), Some(&first));
        assert_eq!(ws.host().closed(), vec![second]);
    }

    #[test]
    fn settings_tab_is_reused_and_spawns_nothing() {
        let (mut ws, _) = workspace();
        let terminal = ws.open_terminal(None);
        let settings = ws.open_settings();
        ws.activate(&terminal);
        assert_eq!(ws.open_settings(), settings);

        assert_eq!(ws.tabs().len(), 2);
        assert_eq!(ws.host().created(), vec![terminal]);
        assert_eq!(
            ws.tabs().active().map(|tab| tab.kind),
            Some(TabKind::Settings)
        );
    }

    #[test]
    fn quit_tears_down_every_session() {
        let (mut ws, logs) = workspace();
        let a = ws.open_terminal(None);
        let b = ws.open_terminal(None);

        assert_eq!(ws.handle_action(Action::Quit), WorkspaceSignal::Exit);
        let mut closed = ws.host().closed();
        closed.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(closed, expected);
        assert!(logs.borrow().iter().all(|log| log.disposed));
    }

    #[test]
    fn welcome_enter_opens_terminal() {
        let (mut ws, _) = workspace();
        ws.handle_panel_key(PanelKey::Enter);
        assert_eq!(ws.tabs().len(), 1);
        assert_eq!(ws.host().created().len(), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Open,
        Close(usize),
        Activate(usize),
        Exit(usize),
        Next,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Open),
            2 => (0..8usize).prop_map(Op::Close),
            2 => (0..8usize).prop_map(Op::Activate),
            1 => (0..8usize).prop_map(Op::Exit),
            1 => Just(Op::Next),
        ]
    }

    proptest! {
        #[test]
        fn tabs_and_sessions_stay_in_step(ops in prop::collection::vec(op(), 1..40)) {
            let (mut ws, _) = workspace();
            for op in ops {
                let ids: Vec<SessionId> = ws.tabs().tabs().map(|tab| tab.id.clone()).collect();
                match op {
                    Op::Open => {
                        ws.open_terminal(None);
                    }
                    Op::Close(i) if !ids.is_empty() => {
                        ws.close_tab(&ids[i % ids.len()]);
                    }
                    Op::Activate(i) if !ids.is_empty() => {
                        ws.activate(&ids[i % ids.len()]);
                    }
                    // A lone tab's exit ends the window; covered separately
                    Op::Exit(i) if ids.len() > 1 => {
                        ws.handle_host_event(exit(&ids[i % ids.len()]));
                    }
                    Op::Next => {
                        ws.handle_action(Action::NextTab);
                    }
                    _ => {}
                }

                let live: Vec<SessionId> = ws.tabs().tabs().map(|tab| tab.id.clone()).collect();
                let created = ws.host().created();
                let closed = ws.host().closed();
                for id in &live {
                    prop_assert!(ws.bridge(id).is_some());
                    prop_assert!(created.contains(id));
                    prop_assert!(!closed.contains(id));
                }
                prop_assert_eq!(created.len() - closed.len(), live.len());
                match ws.tabs().active_id() {
                    Some(active) => prop_assert!(live.contains(active)),
                    None => prop_assert!(live.is_empty()),
                }
            }
        }
    }
}

// ============================================================================
// Session Routing Tests
// ============================================================================

mod session_routing {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    #[test]
    fn output_reaches_its_own_surface_in_order() {
        let (mut ws, logs) = workspace();
        let a = ws.open_terminal(None);
        let b = ws.open_terminal(None);

        ws.handle_host_event(data(&a, "one"));
        ws.handle_host_event(data(&b, "other"));
        ws.handle_host_event(data(&a, "two"));

        let logs = logs.borrow();
        assert_eq!(logs[0].written, vec!["one", "two"]);
        assert_eq!(logs[1].written, vec!["other"]);
    }

    #[test]
    #[traced_test]
    fn output_after_close_is_dropped() {
        let (mut ws, logs) = workspace();
        let a = ws.open_terminal(None);
        ws.open_terminal(None);
        ws.close_tab(&a);

        assert_eq!(
            ws.handle_host_event(data(&a, "late output")),
            WorkspaceSignal::Continue
        );
        assert_eq!(ws.handle_host_event(exit(&a)), WorkspaceSignal::Continue);
        assert!(logs.borrow()[0].written.is_empty());
        assert_eq!(ws.tabs().len(), 1);
        assert!(logs_contain("Dropping"));
    }

    #[test]
    fn input_goes_to_active_session_only() {
        let (mut ws, _) = workspace();
        let a = ws.open_terminal(None);
        let b = ws.open_terminal(None);

        assert!(ws.send_input("ls\r"));
        ws.activate(&a);
        assert!(ws.send_input("pwd\r"));

        assert_eq!(ws.host().writes_to(&b), vec!["ls\r"]);
        assert_eq!(ws.host().writes_to(&a), vec!["pwd\r"]);
    }

    #[test]
    fn input_with_no_terminal_goes_nowhere() {
        let (mut ws, _) = workspace();
        assert!(!ws.send_input("x"));
        ws.open_settings();
        assert!(!ws.send_input("x"));
        assert!(ws.host().calls.is_empty());
    }

    #[test]
    fn resize_refits_every_session_once() {
        let (mut ws, _) = workspace();
        let a = ws.open_terminal(None);
        let b = ws.open_terminal(None);
        assert!(ws.host().resizes_of(&a).is_empty());

        ws.resize(SurfaceArea::from_cells(132, 43));
        ws.resize(SurfaceArea::from_cells(132, 43));

        assert_eq!(ws.host().resizes_of(&a), vec![TermSize::new(132, 43)]);
        assert_eq!(ws.host().resizes_of(&b), vec![TermSize::new(132, 43)]);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;
    use actions::Action;
    use common::workspace_with;
    use settings::RemoteProfileForm;

    #[test]
    fn theme_change_reaches_every_live_surface_once() {
        let (mut ws, logs) = workspace();
        let a = ws.open_terminal(None);
        ws.open_terminal(None);
        ws.open_terminal(None);
        ws.close_tab(&a);

        ws.handle_action(Action::SelectTheme("dracula".into()));
        assert!(ws.pump_config());
        assert!(!ws.pump_config());

        let logs = logs.borrow();
        assert!(logs[0].themes.is_empty());
        assert_eq!(logs[1].themes, vec!["dracula"]);
        assert_eq!(logs[2].themes, vec!["dracula"]);
    }

    #[test]
    fn new_surfaces_start_with_current_theme() {
        let (mut ws, logs) = workspace();
        ws.select_theme("campbell").unwrap();
        ws.open_terminal(None);
        assert_eq!(logs.borrow()[0].initial_theme, "campbell");
    }

    #[test]
    fn unknown_theme_is_rejected_without_broadcast() {
        let (mut ws, logs) = workspace();
        ws.open_terminal(None);
        assert!(ws.select_theme("no-such-theme").is_err());
        assert!(!ws.pump_config());
        assert!(logs.borrow()[0].themes.is_empty());
    }

    #[test]
    fn saved_profiles_and_theme_survive_restart() {
        let env = TestEnv::new();
        {
            let mut config = env.config();
            config
                .add_profile_from_form(&RemoteProfileForm {
                    name: "Prod".into(),
                    host: "prod1".into(),
                    port: "2200".into(),
                    username: "deploy".into(),
                    ..Default::default()
                })
                .unwrap();
            config.select_theme("dracula").unwrap();
        }
        assert!(env.read_store().is_some());

        let config = env.config();
        assert_eq!(config.theme_id(), "dracula");
        let remote = config.remote_profiles();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].name, "Prod");
        assert_eq!(remote[0].port, 2200);
    }

    #[test]
    fn menu_opens_saved_profile_as_ssh_session() {
        let env = TestEnv::new();
        let mut config = env.config();
        let profile = config
            .add_profile_from_form(&RemoteProfileForm {
                name: "Prod".into(),
                host: "prod1".into(),
                username: "deploy".into(),
                ..Default::default()
            })
            .unwrap();
        let (mut ws, _) = workspace_with(config);

        assert_eq!(
            ws.handle_action(Action::NewTabWithProfile(profile.id.clone())),
            WorkspaceSignal::Continue
        );
        let tab = ws.tabs().active().unwrap();
        assert_eq!(tab.title, "Prod");
        let invocation = tab.invocation.clone().unwrap();
        assert_eq!(invocation.command.as_deref(), Some("ssh"));
        assert_eq!(invocation.args, vec!["deploy@prod1"]);
    }

    #[test]
    fn settings_form_submission_updates_menu() {
        let (mut ws, _) = workspace();
        let before = ws.menu().entries().len();
        ws.open_settings();

        ws.handle_panel_key(PanelKey::Char('a'));
        for (i, value) in ["Prod", "prod1", "", "deploy"].iter().enumerate() {
            if i > 0 {
                ws.handle_panel_key(PanelKey::Tab);
            }
            for c in value.chars() {
                ws.handle_panel_key(PanelKey::Char(c));
            }
        }
        ws.handle_panel_key(PanelKey::Enter);

        assert!(ws.settings_panel().form().is_none());
        assert_eq!(ws.settings_panel().status(), Some("Saved profile Prod"));
        assert!(ws.pump_config());
        assert_eq!(ws.menu().entries().len(), before + 1);
    }

    #[test]
    fn invalid_form_keeps_form_open_with_reason() {
        let (mut ws, _) = workspace();
        ws.open_settings();
        ws.handle_panel_key(PanelKey::Char('a'));
        ws.handle_panel_key(PanelKey::Enter);

        assert!(ws.settings_panel().form().is_some());
        assert_eq!(
            ws.settings_panel().status(),
            Some("profile name is required")
        );
        assert!(ws.config().remote_profiles().is_empty());
    }
}
