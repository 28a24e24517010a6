use std::{
    io::Read,
    net::TcpListener,
    thread,
    time::Duration,
};
use zpl_label::{frame, send, Config, Error, MonochromeBitmap, Printer};

fn sample_command() -> zpl_label::LabelCommand {
    let bitmap = MonochromeBitmap::from_packed(16, 2, vec![0xF0, 0x0F, 0x00, 0xFF]).unwrap();
    frame(&bitmap, 10, 10)
}

/// Accept one connection and return everything written to it.
fn spawn_receiver() -> (u16, thread::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        received
    });
    (port, handle)
}

fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn send_writes_whole_command() {
    let (port, receiver) = spawn_receiver();
    let command = sample_command();

    send(&command, "127.0.0.1", port).unwrap();

    let received = receiver.join().unwrap();
    assert_eq!(received, command.as_bytes());
    assert_eq!(
        String::from_utf8(received).unwrap(),
        "^XA^FO10,10^GFA,4,4,2,F00F00FF^FS^XZ"
    );
}

#[test]
fn printer_with_timeouts_writes_whole_command() {
    let (port, receiver) = spawn_receiver();
    let command = sample_command();

    let config = Config::new("127.0.0.1")
        .port(port)
        .connect_timeout(Duration::from_secs(5))
        .write_timeout(Duration::from_secs(5));
    Printer::new(config).print(&command).unwrap();

    assert_eq!(receiver.join().unwrap(), command.as_bytes());
}

#[test]
fn one_connection_per_label() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let receiver = thread::spawn(move || {
        (0..2)
            .map(|_| {
                let (mut stream, _) = listener.accept().unwrap();
                let mut received = Vec::new();
                stream.read_to_end(&mut received).unwrap();
                received
            })
            .collect::<Vec<_>>()
    });

    let printer = Printer::new(Config::new("127.0.0.1").port(port));
    let command = sample_command();
    printer.print(&command).unwrap();
    printer.print(&command).unwrap();

    let received = receiver.join().unwrap();
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|r| r.as_slice() == command.as_bytes()));
}

#[test]
fn peer_hanging_up_after_full_read_is_delivered() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let command = sample_command();
    let expected_len = command.len();
    let receiver = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = vec![0u8; expected_len];
        stream.read_exact(&mut received).unwrap();
        drop(stream);
        received
    });

    send(&command, "127.0.0.1", port).unwrap();

    assert_eq!(receiver.join().unwrap(), command.as_bytes());
}

#[test]
fn refused_connection_is_connection_error() {
    let port = unused_port();
    let err = send(&sample_command(), "127.0.0.1", port).unwrap_err();
    match err {
        Error::Connection { addr, .. } => assert_eq!(addr, format!("127.0.0.1:{}", port)),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn refused_connection_with_timeout_is_connection_error() {
    let port = unused_port();
    let config = Config::new("127.0.0.1")
        .port(port)
        .connect_timeout(Duration::from_secs(2));
    let err = Printer::new(config).print(&sample_command()).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
}

#[test]
fn unresolvable_host_is_connection_error() {
    let err = send(&sample_command(), "printer.invalid", 9100).unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
}
