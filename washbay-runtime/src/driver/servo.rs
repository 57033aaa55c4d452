use std::ops::RangeInclusive;

/// Pulse offset of the servo.
const OFFSET_DUTY: f32 = 0.5;
/// Duty cycle for the minimum angle of the servo.
const SERVO_MIN_DUTY: f32 = 2.5 + OFFSET_DUTY;
/// Duty cycle for the maximum angle of the servo.
const SERVO_MAX_DUTY: f32 = 12.5 + OFFSET_DUTY;
/// Full mechanical range of the servo in degrees.
const SERVO_RANGE: f32 = 180.0;

/// PWM frequency of the servo signal in hertz.
pub const SERVO_FREQUENCY: u32 = 50;

/// Barrier arm servo.
///
/// The barrier arm is mechanically limited to a part of the servo range.
/// Angles outside that range are clamped before they reach the servo.
#[derive(Clone, Debug)]
pub struct Servo {
    /// Allowed angle range in degrees.
    limit: RangeInclusive<u16>,
    /// Barrier closed angle.
    closed: u16,
    /// Barrier open angle.
    open: u16,
    /// Last commanded angle.
    angle: u16,
}

impl Servo {
    /// Construct a barrier servo at the closed position.
    pub fn barrier() -> Self {
        Self {
            limit: 0..=110,
            closed: 20,
            open: 110,
            angle: 20,
        }
    }

    /// Last commanded angle.
    #[inline]
    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn is_open(&self) -> bool {
        self.angle == self.open
    }

    pub fn is_closed(&self) -> bool {
        self.angle == self.closed
    }

    /// Clamp the angle and return the duty cycle to write.
    pub fn write(&mut self, angle: u16) -> f32 {
        self.angle = angle.clamp(*self.limit.start(), *self.limit.end());
        Self::duty_cycle(self.angle)
    }

    /// Map an angle onto a PWM duty cycle in percent.
    pub fn duty_cycle(angle: u16) -> f32 {
        SERVO_MIN_DUTY + (SERVO_MAX_DUTY - SERVO_MIN_DUTY) * angle as f32 / SERVO_RANGE
    }

    /// Angles to sweep through, one degree per step, to open the barrier.
    pub fn open_sweep(&self) -> Vec<u16> {
        Self::sweep(self.angle, self.open)
    }

    /// Angles to sweep through, one degree per step, to close the barrier.
    pub fn close_sweep(&self) -> Vec<u16> {
        Self::sweep(self.angle, self.closed)
    }

    fn sweep(from: u16, to: u16) -> Vec<u16> {
        if from <= to {
            (from..=to).skip(1).collect()
        } else {
            (to..from).rev().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duty_cycle() {
        assert_eq!(Servo::duty_cycle(0), 3.0);
        assert_eq!(Servo::duty_cycle(180), 13.0);
        assert!((Servo::duty_cycle(90) - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_write_clamps_angle() {
        let mut servo = Servo::barrier();

        servo.write(170);
        assert_eq!(servo.angle(), 110);
        assert!(servo.is_open());

        servo.write(45);
        assert_eq!(servo.angle(), 45);
    }

    #[test]
    fn test_sweep() {
        let mut servo = Servo::barrier();
        assert!(servo.is_closed());

        let open = servo.open_sweep();
        assert_eq!(open.len(), 90);
        assert_eq!(open.first(), Some(&21));
        assert_eq!(open.last(), Some(&110));

        for angle in open {
            servo.write(angle);
        }
        assert!(servo.is_open());
        assert!(servo.open_sweep().is_empty());

        let close = servo.close_sweep();
        assert_eq!(close.len(), 90);
        assert_eq!(close.first(), Some(&109));
        assert_eq!(close.last(), Some(&20));
    }
}
