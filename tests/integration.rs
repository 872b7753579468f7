//! Integration tests for devlink.
//!
//! These tests verify the integration between the layers: messages
//! rendered through the codec, carried as frame payloads, recovered by
//! the parser, and decoded back, with noise and failure modes in
//! between.

use devlink::message::{
    BootloaderStatusResponse, BootloaderState, EndpointInfo, Message, RegisterDataResponse,
    RegisterFlags, RegisterName, RegisterValue,
};
use devlink::transport::{
    encode_frame, BufferedEmitter, Event, Parser, StreamEmitter, FRAME_DELIMITER,
};

/// Feed wire bytes into a parser, collecting owned events.
fn collect_events<const N: usize>(parser: &mut Parser<N>, wire: &[u8]) -> Vec<OwnedEvent> {
    let mut events = Vec::new();
    for &byte in wire {
        match parser.feed(byte) {
            Some(Event::Frame(frame)) => events.push(OwnedEvent::Frame {
                type_code: frame.type_code,
                payload: frame.payload.to_vec(),
            }),
            Some(Event::Extraneous(data)) => events.push(OwnedEvent::Extraneous(data.to_vec())),
            None => {}
        }
    }
    events
}

#[derive(Debug, PartialEq, Eq)]
enum OwnedEvent {
    Frame { type_code: u8, payload: Vec<u8> },
    Extraneous(Vec<u8>),
}

#[test]
fn test_message_to_frame_to_message() {
    let mut response = RegisterDataResponse::default();
    response.timestamp = 1_234_567_890;
    response.flags = RegisterFlags(0b11);
    response.name = RegisterName::from("motor.speed_limit");
    let mut values: heapless::Vec<f32, 64> = heapless::Vec::new();
    values.extend_from_slice(&[0.25, -8.5e3, 1.0]).unwrap();
    response.value = RegisterValue::F32(values);

    let mut payload: Vec<u8> = Vec::new();
    response.encode(&mut payload);

    let mut wire = bytes::BytesMut::new();
    encode_frame(42, &payload, &mut wire);

    let mut parser: Parser = Parser::new();
    let events = collect_events(&mut parser, &wire);
    assert_eq!(events.len(), 1);
    match &events[0] {
        OwnedEvent::Frame { type_code, payload } => {
            assert_eq!(*type_code, 42);
            let decoded = RegisterDataResponse::try_decode(payload).unwrap();
            assert_eq!(decoded, response);
        }
        other => panic!("expected frame, got {other:?}"),
    }
}

#[test]
fn test_extraneous_data_precedes_frame() {
    // Diagnostics text interleaved with a real frame comes back out in
    // order, before the frame.
    let mut wire: Vec<u8> = b"boot: devlink v2\r\n".to_vec();
    wire.extend(BufferedEmitter::new(7, &[1, 2, 3]));

    let mut parser: Parser = Parser::new();
    let events = collect_events(&mut parser, &wire);
    assert_eq!(
        events,
        [
            OwnedEvent::Extraneous(b"boot: devlink v2\r\n".to_vec()),
            OwnedEvent::Frame {
                type_code: 7,
                payload: vec![1, 2, 3]
            },
        ]
    );
}

#[test]
fn test_parser_recovers_after_overflow() {
    let mut parser: Parser<64> = Parser::new();

    // A frame far beyond the parser's capacity, then a small one.
    let mut wire: Vec<u8> = BufferedEmitter::new(9, &[0xA5; 300]).collect();
    let small: Vec<u8> = BufferedEmitter::new(10, &[4, 5, 6]).collect();
    wire.extend_from_slice(&small);

    let events = collect_events(&mut parser, &wire);
    let frames: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, OwnedEvent::Frame { .. }))
        .collect();
    assert_eq!(
        frames,
        [&OwnedEvent::Frame {
            type_code: 10,
            payload: vec![4, 5, 6]
        }]
    );

    // Nothing was dropped: extraneous output accounts for every
    // de-escaped byte of the oversized body (payload, type code, CRC).
    let extraneous_total: usize = events
        .iter()
        .filter_map(|e| match e {
            OwnedEvent::Extraneous(data) => Some(data.len()),
            _ => None,
        })
        .sum();
    assert_eq!(extraneous_total, 300 + 5);
}

#[test]
fn test_corrupted_frame_is_reported_not_lost() {
    let mut wire: Vec<u8> = BufferedEmitter::new(5, &[10, 20, 30]).collect();
    wire[2] ^= 0xFF; // Corrupt one payload byte.
    let followup: Vec<u8> = BufferedEmitter::new(5, &[10, 20, 30]).collect();
    wire.extend_from_slice(&followup);

    let mut parser: Parser = Parser::new();
    let events = collect_events(&mut parser, &wire);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], OwnedEvent::Extraneous(data) if data.len() == 8));
    assert_eq!(
        events[1],
        OwnedEvent::Frame {
            type_code: 5,
            payload: vec![10, 20, 30]
        }
    );
}

#[test]
fn test_stream_emitter_end_to_end() {
    let mut parser: Parser = Parser::new();
    let mut frames = Vec::new();

    let mut wire: Vec<u8> = Vec::new();
    {
        let mut emitter = StreamEmitter::new(33, |byte| wire.push(byte));
        for chunk in [&b"first"[..], &b" and"[..], &b" second"[..]] {
            emitter.push_bytes(chunk);
        }
        emitter.finish();
    }
    for &byte in &wire {
        if let Some(Event::Frame(frame)) = parser.feed(byte) {
            frames.push((frame.type_code, frame.payload.to_vec()));
        }
    }
    assert_eq!(frames, [(33, b"first and second".to_vec())]);
}

#[test]
fn test_aborted_stream_frame_then_clean_frame() {
    let mut wire: Vec<u8> = Vec::new();
    {
        let mut emitter = StreamEmitter::new(1, |byte| wire.push(byte));
        emitter.push_bytes(&[0xDE, 0xAD]);
        // Dropped without finish: aborted mid-frame.
    }
    wire.extend(BufferedEmitter::new(2, &[0xBE, 0xEF]));

    let mut parser: Parser = Parser::new();
    let events = collect_events(&mut parser, &wire);
    assert_eq!(
        events,
        [
            OwnedEvent::Extraneous(vec![0xDE, 0xAD]),
            OwnedEvent::Frame {
                type_code: 2,
                payload: vec![0xBE, 0xEF]
            },
        ]
    );
}

#[test]
fn test_every_payload_pattern_round_trips() {
    // Deterministic sweep over payload contents that stress escaping:
    // runs of delimiters, escapes, their complements, and plain bytes.
    let patterns: [&[u8]; 6] = [
        &[],
        &[0x8E],
        &[0x9E, 0x8E, 0x9E],
        &[0x71, 0x61, 0x00, 0xFF],
        &[0x8E; 32],
        &[0x9E; 32],
    ];

    let mut parser: Parser = Parser::new();
    for (i, payload) in patterns.iter().enumerate() {
        for type_code in [0u8, 0x8E, 0x9E, 255] {
            let wire: Vec<u8> = BufferedEmitter::new(type_code, payload).collect();
            let events = collect_events(&mut parser, &wire);
            assert_eq!(
                events,
                [OwnedEvent::Frame {
                    type_code,
                    payload: payload.to_vec()
                }],
                "pattern {i} type {type_code}"
            );
        }
    }
}

#[test]
fn test_mixed_traffic_sequence() {
    // A realistic session: noise, an endpoint info exchange, then a
    // bootloader status report, separated by idle delimiters.
    let mut wire: Vec<u8> = vec![0x00, 0x55, 0xAA];

    let request = EndpointInfo::default();
    assert!(request.is_request());
    let mut request_payload: Vec<u8> = Vec::new();
    request.encode(&mut request_payload);
    wire.extend(BufferedEmitter::new(0, &request_payload));

    wire.push(FRAME_DELIMITER); // Idle line.

    let status = BootloaderStatusResponse {
        timestamp: 55,
        flags: 7,
        state: BootloaderState::ReadyToBoot,
    };
    let mut status_payload: Vec<u8> = Vec::new();
    status.encode(&mut status_payload);
    wire.extend(BufferedEmitter::new(0, &status_payload));

    let mut parser: Parser = Parser::new();
    let events = collect_events(&mut parser, &wire);
    assert_eq!(events.len(), 3);

    assert_eq!(events[0], OwnedEvent::Extraneous(vec![0x00, 0x55, 0xAA]));
    match &events[1] {
        OwnedEvent::Frame { payload, .. } => {
            assert!(EndpointInfo::try_decode(payload).unwrap().is_request());
        }
        other => panic!("expected frame, got {other:?}"),
    }
    match &events[2] {
        OwnedEvent::Frame { payload, .. } => {
            assert_eq!(BootloaderStatusResponse::try_decode(payload).unwrap(), status);
        }
        other => panic!("expected frame, got {other:?}"),
    }
}

#[test]
fn test_encode_is_stable_through_decode() {
    // encode(decode(encode(m))) == encode(m), bytewise.
    let mut msg = RegisterDataResponse::default();
    msg.timestamp = u64::MAX;
    msg.name = RegisterName::from("a");
    let mut values: heapless::Vec<f64, 32> = heapless::Vec::new();
    values.extend_from_slice(&[f64::NAN, 1.0]).unwrap();
    msg.value = RegisterValue::F64(values);

    let mut first: Vec<u8> = Vec::new();
    msg.encode(&mut first);
    let decoded = RegisterDataResponse::try_decode(&first).unwrap();
    let mut second: Vec<u8> = Vec::new();
    decoded.encode(&mut second);
    // NaN payload bits survive even though NaN != NaN.
    assert_eq!(first, second);
}
