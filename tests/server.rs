mod common;

use common::synthetic_image::target_frame;
use common::{centered_sight, init_logging, stock_coordinator};
use pov_framing::demo::DemoRecorder;
use pov_framing::image::GrayImageU8;
use pov_framing::protocol::{Request, RequestHeader};
use pov_framing::server::{Poll, Server};
use pov_framing::transport::channel::channel;
use pov_framing::transport::{TcpClient, TcpTransport};
use pov_framing::Mode;
use serde_json::{json, Value};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn request(mode: Mode, pov_id: Option<u64>, frame: &GrayImageU8) -> Request {
    Request {
        header: RequestHeader::new(mode, pov_id),
        frame: frame.clone(),
    }
}

fn body(json_text: &str) -> Value {
    serde_json::from_str(json_text).expect("reply body is JSON")
}

#[test]
fn learning_then_recognition_over_channel() {
    init_logging();
    let (transport, client) = channel();
    let mut server = Server::new(transport, stock_coordinator(vec![centered_sight()]));
    let frame = target_frame(100, 100);

    client.send(request(Mode::Learning, None, &frame)).unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Replied);
    let reply = client.try_receive().expect("learning reply");
    assert_eq!(body(&reply.body), json!({"learning": {"id": 1}}));
    assert!(reply.image.is_none());

    client.send(request(Mode::Recognition, Some(1), &frame)).unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Replied);
    let reply = client.try_receive().expect("recognition reply");
    assert_eq!(body(&reply.body)["recognition"]["success"], json!(true));
}

#[test]
fn error_flag_and_unknown_pov_get_no_reply() {
    let (transport, client) = channel();
    let mut server = Server::new(transport, stock_coordinator(vec![centered_sight()]));

    let mut flagged = request(Mode::Learning, None, &GrayImageU8::zeros(0, 0));
    flagged.header.error = true;
    client.send(flagged).unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Skipped);
    assert!(client.try_receive().is_none());
    assert!(server.coordinator().store().learned_ids().is_empty());

    client
        .send(request(Mode::Recognition, Some(99), &target_frame(32, 32)))
        .unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Dropped);
    assert!(client.try_receive().is_none());

    // the loop keeps serving afterwards
    client
        .send(request(Mode::Prelearning, None, &target_frame(32, 32)))
        .unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Replied);
    let reply = client.try_receive().expect("prelearning reply");
    assert_eq!(body(&reply.body), json!({"prelearning": {"nb_kp": 0}}));
}

#[test]
fn empty_frame_is_dropped_and_unknown_pov_framing_is_answered() {
    let (transport, client) = channel();
    let mut server = Server::new(transport, stock_coordinator(vec![centered_sight()]));

    client
        .send(request(Mode::Learning, None, &GrayImageU8::zeros(0, 0)))
        .unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Dropped);
    assert!(client.try_receive().is_none());
    assert!(server.coordinator().store().learned_ids().is_empty());

    let frame = target_frame(40, 30);
    client.send(request(Mode::Framing, Some(404), &frame)).unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Replied);
    let reply = client.try_receive().expect("framing reply");
    assert_eq!(body(&reply.body), json!({"framing": {"success": false}}));
    assert_eq!(reply.image, Some(frame));
}

#[test]
fn demo_capture_records_recognition_frames_until_error_flag() {
    let root = std::env::temp_dir().join(format!("pov_framing_demo_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);

    let (transport, client) = channel();
    let mut server = Server::new(transport, stock_coordinator(vec![centered_sight()]))
        .with_demo(DemoRecorder::new(&root).unwrap());
    let frame = target_frame(100, 100);

    client.send(request(Mode::Learning, None, &frame)).unwrap();
    client.send(request(Mode::Recognition, Some(1), &frame)).unwrap();
    client.send(request(Mode::Recognition, Some(1), &frame)).unwrap();
    for _ in 0..3 {
        assert_eq!(server.poll_once().unwrap(), Poll::Replied);
    }

    let sessions: Vec<_> = std::fs::read_dir(&root).unwrap().collect();
    assert_eq!(sessions.len(), 1);
    let session = sessions[0].as_ref().unwrap().path();
    assert!(session.join("frame_00000.png").is_file());
    assert!(session.join("frame_00001.png").is_file());

    let mut flagged = request(Mode::Recognition, Some(1), &GrayImageU8::zeros(0, 0));
    flagged.header.error = true;
    client.send(flagged).unwrap();
    assert_eq!(server.poll_once().unwrap(), Poll::Skipped);

    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn framing_over_tcp_returns_an_image() {
    init_logging();
    let transport = TcpTransport::bind("127.0.0.1:0").unwrap();
    let addr = transport.local_addr().unwrap();
    let (done_tx, done_rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let mut server = Server::new(transport, stock_coordinator(vec![centered_sight()]));
        let mut replied = 0;
        while replied < 2 {
            match server.poll_once().unwrap() {
                Poll::Replied => replied += 1,
                Poll::Idle => {}
                other => panic!("unexpected poll result {other:?}"),
            }
        }
        done_tx.send(()).unwrap();
    });

    let mut client = TcpClient::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    let frame = target_frame(64, 48);

    client
        .send(&RequestHeader::new(Mode::Learning, None), Some(&frame))
        .unwrap();
    let reply = client.receive().unwrap();
    assert_eq!(body(&reply.body), json!({"learning": {"id": 1}}));

    let header = RequestHeader {
        mode: 9,
        pov_id: Some(1),
        ..RequestHeader::default()
    };
    client.send(&header, Some(&frame)).unwrap();
    let reply = client.receive().unwrap();
    assert_eq!(body(&reply.body), json!({"framing": {"success": false}}));
    assert_eq!(reply.image, Some(frame));

    done_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    handle.join().unwrap();
}
