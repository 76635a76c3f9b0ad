use std::io::Cursor;
use std::sync::Arc;

use geoadmin_autocomplete::{
    bridge::{
        protocol::{HostCommand, HostEvent, encode_command, parse_event},
        session::{BridgeSession, SessionStep, run_bridge},
    },
    form::form_model::FieldIds,
    panel::{geometry::ElementGeometry, panel::SurfacePatch},
    search::client::StaticBackend,
    widget::event::PointerTarget,
};
use serde_json::Value;

mod common;
use common::fixtures::bahnhofstrasse;

fn all_fields() -> Vec<String> {
    ["id_strasse", "id_plz", "id_ort", "id_kanton", "id_egid"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn output_lines(session: BridgeSession<Vec<u8>>) -> Vec<Value> {
    let bytes = session.into_output();
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// =========================================================================
// Protocol
// =========================================================================

#[test]
fn parse_event_reads_every_kind() {
    assert_eq!(
        parse_event(r#"{"event":"init","fields":["id_strasse"]}"#).unwrap(),
        HostEvent::Init {
            fields: vec!["id_strasse".into()]
        }
    );

    match parse_event(
        r#"{"event":"input","value":"Bahn","anchor":{"left":1,"top":2,"width":3,"height":4}}"#,
    )
    .unwrap()
    {
        HostEvent::Input {
            value,
            anchor,
            scroll,
        } => {
            assert_eq!(value, "Bahn");
            assert_eq!(
                anchor,
                ElementGeometry {
                    left: 1.0,
                    top: 2.0,
                    width: 3.0,
                    height: 4.0
                }
            );
            assert_eq!(scroll.y, 0.0, "Scroll defaults to zero");
        }
        other => panic!("Expected Input, got {:?}", other),
    }

    assert_eq!(
        parse_event(r#"{"event":"pointer","target":{"row":2}}"#).unwrap(),
        HostEvent::Pointer {
            target: PointerTarget::Row(2)
        }
    );
    assert_eq!(
        parse_event(r#"{"event":"pointer","target":"outside"}"#).unwrap(),
        HostEvent::Pointer {
            target: PointerTarget::Outside
        }
    );
    assert_eq!(
        parse_event(r#"{"event":"hover","row":0,"entered":true}"#).unwrap(),
        HostEvent::Hover {
            row: 0,
            entered: true
        }
    );
    assert_eq!(parse_event(r#"{"event":"quit"}"#).unwrap(), HostEvent::Quit);
}

#[test]
fn parse_event_rejects_unknown_kind() {
    assert!(parse_event(r#"{"event":"scroll"}"#).is_err());
    assert!(parse_event("not json").is_err());
}

#[test]
fn encode_command_shapes() {
    assert_eq!(
        encode_command(&HostCommand::SetField {
            id: "id_plz".into(),
            value: "8000".into()
        })
        .unwrap(),
        r#"{"cmd":"set_field","id":"id_plz","value":"8000"}"#
    );
    assert_eq!(
        encode_command(&HostCommand::Surface {
            patch: SurfacePatch::Show
        })
        .unwrap(),
        r#"{"cmd":"surface","patch":{"op":"show"}}"#
    );
    assert_eq!(encode_command(&HostCommand::Ready).unwrap(), r#"{"cmd":"ready"}"#);
}

// =========================================================================
// Session
// =========================================================================

#[test]
fn session_runs_full_selection() {
    let backend = StaticBackend::new(vec![bahnhofstrasse()]);
    let mut session = BridgeSession::new(FieldIds::default(), Vec::new());

    let step = session
        .handle_host_event(HostEvent::Init {
            fields: all_fields(),
        })
        .unwrap();
    assert_eq!(step, SessionStep::Continue(None));
    assert!(session.is_attached());

    let step = session
        .handle_host_event(HostEvent::Input {
            value: "Bahnhofstr".into(),
            anchor: ElementGeometry::default(),
            scroll: Default::default(),
        })
        .unwrap();
    let request = match step {
        SessionStep::Continue(Some(request)) => request,
        other => panic!("Expected a search request, got {:?}", other),
    };
    session.handle_resolved(request.run(&backend)).unwrap();

    session
        .handle_host_event(HostEvent::Pointer {
            target: PointerTarget::Row(0),
        })
        .unwrap();

    let lines = output_lines(session);
    assert_eq!(lines[0]["cmd"], "ready");
    assert_eq!(lines[1]["patch"]["op"], "attach");

    let ops: Vec<&str> = lines
        .iter()
        .filter(|l| l["cmd"] == "surface")
        .filter_map(|l| l["patch"]["op"].as_str())
        .collect();
    assert_eq!(ops, vec!["attach", "move", "replace", "show", "hide"]);

    let writes: Vec<(String, String)> = lines
        .iter()
        .filter(|l| l["cmd"] == "set_field")
        .map(|l| {
            (
                l["id"].as_str().unwrap().to_string(),
                l["value"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        writes,
        vec![
            ("id_strasse".to_string(), "Bahnhofstrasse 1".to_string()),
            ("id_plz".to_string(), "8000".to_string()),
            ("id_ort".to_string(), "Zürich".to_string()),
            ("id_egid".to_string(), "700123".to_string()),
            ("id_kanton".to_string(), "ZH".to_string()),
        ]
    );
}

#[test]
fn session_without_street_field_is_disabled() {
    let mut session = BridgeSession::new(FieldIds::default(), Vec::new());
    let step = session
        .handle_host_event(HostEvent::Init {
            fields: vec!["id_plz".into()],
        })
        .unwrap();

    assert_eq!(step, SessionStep::Stop);
    assert!(!session.is_attached());

    let lines = output_lines(session);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["cmd"], "disabled");
    assert!(lines[0]["reason"].as_str().unwrap().contains("id_strasse"));
}

#[test]
fn session_ignores_events_before_init() {
    let mut session = BridgeSession::new(FieldIds::default(), Vec::new());
    let step = session
        .handle_host_event(HostEvent::Input {
            value: "Bahnhofstr".into(),
            anchor: ElementGeometry::default(),
            scroll: Default::default(),
        })
        .unwrap();
    assert_eq!(step, SessionStep::Continue(None));
    assert!(output_lines(session).is_empty());
}

#[test]
fn session_uses_configured_field_ids() {
    let ids = FieldIds {
        street: "street".into(),
        ..FieldIds::default()
    };
    let mut session = BridgeSession::new(ids, Vec::new());
    let step = session
        .handle_host_event(HostEvent::Init {
            fields: vec!["street".into()],
        })
        .unwrap();
    assert_eq!(step, SessionStep::Continue(None));
    assert!(session.is_attached());
}

// =========================================================================
// Event loop
// =========================================================================

#[test]
fn run_bridge_drains_pending_searches_at_eof() {
    let input = concat!(
        r#"{"event":"init","fields":["id_strasse","id_plz","id_ort"]}"#,
        "\n",
        "garbage line\n",
        "\n",
        r#"{"event":"input","value":"Bahnhofstr"}"#,
        "\n",
    );
    let backend = Arc::new(StaticBackend::new(vec![bahnhofstrasse()]));
    let mut session = BridgeSession::new(FieldIds::default(), Vec::new());

    run_bridge(Cursor::new(input.as_bytes().to_vec()), &mut session, backend.clone()).unwrap();

    assert_eq!(backend.queries(), vec!["Bahnhofstr".to_string()]);
    let lines = output_lines(session);
    assert!(
        lines
            .iter()
            .any(|l| l["cmd"] == "surface" && l["patch"]["op"] == "show"),
        "Search answered before the loop exited"
    );
}

#[test]
fn run_bridge_stops_on_quit() {
    let input = concat!(
        r#"{"event":"init","fields":["id_strasse"]}"#,
        "\n",
        r#"{"event":"quit"}"#,
        "\n",
        r#"{"event":"input","value":"Bahnhofstr"}"#,
        "\n",
    );
    let backend = Arc::new(StaticBackend::new(vec![bahnhofstrasse()]));
    let mut session = BridgeSession::new(FieldIds::default(), Vec::new());

    run_bridge(Cursor::new(input.as_bytes().to_vec()), &mut session, backend.clone()).unwrap();
    assert!(backend.queries().is_empty(), "Nothing after quit is processed");
}
