//! Drives the transmitter and receiver state machines against shared rings
//! directly, without a scheduler, to exercise the full control-then-data
//! handshake across module boundaries.

use networksim::{
    receiver::ReceiverState, transmitter::{DataStepOutcome, TransmitterState}, Constants,
    ControlSignal, Model, Ram, ReceiverKind, Ring, TimeUnit, TrafficMethod, TransmitterKind,
};

fn model(num_nodes: usize) -> Model {
    let constants = Constants {
        num_nodes,
        ..Constants::default()
    };
    Model::new(constants, TimeUnit::Nanoseconds, 8, 4).unwrap()
}

#[test]
fn fixed_transmitter_tunable_receiver_round_trip() {
    let model = model(3);
    let codec = ControlSignal::default();
    let mut control_ring = Ring::new(usize::MAX, &model, false);
    let mut data_rings: Vec<Ring> = (0..3).map(|i| Ring::new(i, &model, false)).collect();

    let mut ram = Ram::new(&model, 0, TrafficMethod::Poisson);
    let mut tx = TransmitterState::new(&model, 0, TransmitterKind::Fixed);

    let now = ram.step(0.0);
    let destination = ram.peek().expect("step() always enqueues a packet").destination;
    // The receiver under test must be the node the sampled packet is actually
    // addressed to, whatever that happens to be for this seed/call order.
    let mut rx = ReceiverState::new(destination, ReceiverKind::Tunable);

    // Fixed transmitter always targets its own ring id.
    let target_ring = tx.target_ring_for(destination);
    assert_eq!(target_ring, 0);

    let err = tx.step_control(
        &ram,
        &mut control_ring,
        &data_rings[target_ring],
        &model,
        &codec,
        now,
    );
    assert!(err.is_none());
    assert_eq!(tx.control_log().len(), 1);
    assert!(tx.flags_consistent());

    // Both tx and rx sit on a non-reversed ring entered at node 0's position,
    // so the packet reaches the receiver's physical location (node
    // `destination`, out of `num_nodes` evenly spaced nodes) after that
    // fraction of one circulation, not a full lap.
    let num_nodes = model.constants().num_nodes as f64;
    let travel_time = model.circulation_time() * destination as f64 / num_nodes;
    rx.step_control(&mut control_ring, &codec, now + travel_time);
    assert!(rx.flags_consistent());
    assert!(rx.awaiting_data());

    let (outcome, _delay) = tx.step_data(&mut ram, &mut data_rings[target_ring], &model, now);
    let record = match outcome {
        DataStepOutcome::Transmitted(record) => record,
        other => panic!("expected a transmission, got {other:?}"),
    };
    assert_eq!(record.destination, destination);
    assert!(tx.flags_consistent());

    // A tunable receiver always retunes on a fresh control reception (even if
    // the announced source is unchanged), so the first data-task tick just
    // pays the tuning delay; the second actually taps the ring.
    let (retune_tick, _delay) =
        rx.step_data(&mut data_rings[target_ring], &model, now + travel_time);
    assert!(retune_tick.is_none(), "first tick after retuning should not check the ring yet");

    let (reception, _delay) =
        rx.step_data(&mut data_rings[target_ring], &model, now + travel_time);
    let reception = reception.expect("receiver should see the data packet it was told about");
    assert_eq!(reception.source, 0);
    assert_eq!(reception.destination, destination);
    assert!(rx.flags_consistent());
    assert!(!rx.awaiting_data());
}

#[test]
fn receiver_without_matching_control_ignores_data_on_its_ring() {
    // A receiver that never ran step_control stays in its initial
    // (control_received = false) state and must not pick up data meant for
    // someone else sharing the same physical ring position.
    let model = model(3);
    // No Ram/destination sampling involved here, so the receiver's node id is
    // arbitrary; any id distinct from the ring below exercises the same guard.
    let arbitrary_receiver_node_id = 1;
    let mut data_ring = Ring::new(0, &model, false);
    let mut rx = ReceiverState::new(arbitrary_receiver_node_id, ReceiverKind::Fixed);

    let (reception, _delay) = rx.step_data(&mut data_ring, &model, 0.0);
    assert!(reception.is_none());
    assert!(rx.flags_consistent());
}
