use std::io::{self, Read};

pub struct Common;

impl Common {
    /// fills `b` completely from `r`, looping over short reads. Running out of input before the
    /// buffer is full is an `UnexpectedEof`.
    pub fn read_full(b: &mut [u8], mut r: impl Read) -> Result<(), io::Error> {
        let len = b.len();
        let mut n = 0;
        while n < len {
            let count = match r.read(&mut b[n..]) {
                Ok(count) => count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            match count {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("should be up to {} bytes, got {}", len, n),
                    ))
                }
                _ => n += count,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // hands out at most 3 bytes per read
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(3).min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn read_full_loops_over_short_reads() {
        let src: Vec<u8> = (0..10).collect();
        let mut buf = [0u8; 10];
        Common::read_full(&mut buf, Trickle(&src)).unwrap();
        assert_eq!(&buf[..], &src[..]);
    }

    #[test]
    fn read_full_reports_eof() {
        let mut buf = [0u8; 8];
        let err = Common::read_full(&mut buf, Trickle(&[1, 2, 3])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
